mod base;
mod conflict;
mod confidence;
mod link;
mod project;
mod relation;
mod schema;
mod types;
mod version;

pub use base::{Memory, MAX_CONTENT_LEN};
pub use confidence::Confidence;
pub use conflict::{ConflictLogEntry, Resolution};
pub use link::{LinkType, MemoryLink};
pub use project::Project;
pub use relation::{MemoryRelation, RelationOrigin, RelationType};
pub use schema::SchemaVersionRecord;
pub use types::{MemorySource, MemoryType};
pub use version::MemoryVersion;
