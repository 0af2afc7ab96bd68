use memoryforge_core::memory::{Memory, RelationType};

/// One edge in a `GraphView`: the memory on the other end, and how it relates.
#[derive(Debug, Clone)]
pub struct RelationEdge {
    pub memory: Memory,
    pub relation_type: RelationType,
}

/// A memory's immediate neighborhood plus the chain of memories that caused it.
#[derive(Debug, Clone)]
pub struct GraphView {
    pub memory: Memory,
    pub incoming: Vec<RelationEdge>,
    pub outgoing: Vec<RelationEdge>,
    /// Walking outgoing `caused_by` edges from `memory`, nearest cause first.
    pub causality_chain: Vec<Memory>,
}
