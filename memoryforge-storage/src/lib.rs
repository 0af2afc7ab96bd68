//! # memoryforge-storage
//!
//! SQLite-backed implementations of the relational store (R) and vector
//! index (V), plus the schema migrator (Mig).

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod schema;
pub mod vector;

pub use engine::StorageEngine;
pub use vector::SqliteVectorIndex;

use memoryforge_core::errors::MemoryForgeError;

/// Every SQLite failure in this crate surfaces as a transient backend error:
/// the caller (M, Ret, Con, ...) decides whether that's retryable.
pub(crate) fn map_err(err: rusqlite::Error) -> MemoryForgeError {
    MemoryForgeError::transient("sqlite", err.to_string())
}
