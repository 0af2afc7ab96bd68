//! Confidence scoring: a pure four-factor weighted average re-run whenever
//! a memory is touched, and the storage-facing scorer that persists it.

pub mod engine;
pub mod formula;

pub use engine::ConfidenceScorer;
pub use formula::{compute, compute_breakdown, ConfidenceBreakdown};
