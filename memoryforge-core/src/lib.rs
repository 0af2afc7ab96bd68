//! # memoryforge-core
//!
//! Foundation crate for the MemoryForge memory engine.
//! Defines all entity types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod traits;
pub mod validation;

// Re-export the most commonly used types at the crate root.
pub use config::MemoryForgeConfig;
pub use errors::{MemoryForgeError, MemoryForgeResult};
pub use memory::{
    Confidence, ConflictLogEntry, LinkType, Memory, MemoryLink, MemoryRelation, MemorySource,
    MemoryType, MemoryVersion, Project, RelationOrigin, RelationType, Resolution,
    SchemaVersionRecord,
};
