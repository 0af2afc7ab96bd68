//! The relation graph between memories: directed links, a neighborhood
//! view with incoming/outgoing edges and the causal chain behind a memory,
//! bounded breadth-first traversal, and causal-consequence lookup.

pub mod navigator;
pub mod types;

pub use navigator::GraphNavigator;
pub use types::{GraphView, RelationEdge};
