use serde::{Deserialize, Serialize};

/// The relationship types the graph builder recognizes between two memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    CausedBy,
    Supersedes,
    RelatesTo,
    Blocks,
    DependsOn,
}

impl RelationType {
    pub const COUNT: usize = 5;

    pub const ALL: [RelationType; Self::COUNT] = [
        Self::CausedBy,
        Self::Supersedes,
        Self::RelatesTo,
        Self::Blocks,
        Self::DependsOn,
    ];
}

/// Who or what asserted a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationOrigin {
    Human,
    GitDerived,
}

/// A directed edge in the memory relationship graph. Self-loops are forbidden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRelation {
    pub id: String,
    pub source_memory_id: String,
    pub target_memory_id: String,
    pub relation_type: RelationType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_by: RelationOrigin,
}
