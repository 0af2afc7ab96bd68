//! The query pipeline over the vector index and relational store: embed,
//! search, hydrate, re-rank, touch `last_accessed`, and explain — falling
//! back to a keyword scan when the embedding provider or vector index fails.

pub mod engine;
pub mod keyword;
pub mod ranking;
pub mod types;

pub use engine::RetrievalEngine;
pub use types::{SearchOptions, SearchResult};
