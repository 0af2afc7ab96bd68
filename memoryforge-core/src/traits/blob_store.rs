use chrono::{DateTime, Utc};

use crate::errors::MemoryForgeResult;

/// Backing store for sync envelopes, named `{memory_id}.json`. A local
/// directory is the reference implementation; a future backend (e.g. an
/// object store) only needs to satisfy this trait.
pub trait BlobStore: Send + Sync {
    /// Create the store's root location if it does not already exist.
    fn initialize(&self) -> MemoryForgeResult<()>;

    /// List every file name currently present in the store.
    fn list_files(&self) -> MemoryForgeResult<Vec<String>>;

    fn read_file(&self, name: &str) -> MemoryForgeResult<Vec<u8>>;

    fn write_file(&self, name: &str, contents: &[u8]) -> MemoryForgeResult<()>;

    fn delete_file(&self, name: &str) -> MemoryForgeResult<()>;

    fn get_last_modified(&self, name: &str) -> MemoryForgeResult<Option<DateTime<Utc>>>;
}
