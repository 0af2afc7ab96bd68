//! Pairwise-similarity consolidation: find near-duplicate memories within a
//! project, suggest merges, merge them behind a version snapshot, and undo
//! a merge by restoring its archived sources. Also home to the staleness
//! sweep that feeds auto-archival of memories nobody has searched for in a
//! while.

pub mod consolidator;
pub mod lifecycle;
pub mod pairs;
pub mod staleness;
pub mod types;

pub use consolidator::Consolidator;
pub use types::{ConsolidateResult, ConsolidationSuggestion, SimilarPair};
