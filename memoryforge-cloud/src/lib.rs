//! Conflict resolution and encrypted file-based sync over a pluggable blob
//! store: push writes an encrypted, checksummed envelope per memory; pull
//! reads them back, merging archive/stale state and content by timestamp.

pub mod blob_store;
pub mod conflict;
pub mod crypto;
pub mod envelope;
pub mod sync;

pub use blob_store::LocalFileBlobStore;
pub use conflict::{detect_conflict, Conflict, ConflictResolver, ResolutionStrategy};
pub use crypto::SyncKey;
pub use envelope::Envelope;
pub use sync::{PullResult, PushResult, SyncEngine};
