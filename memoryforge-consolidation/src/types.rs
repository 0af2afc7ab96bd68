use memoryforge_core::memory::{Memory, MemoryType};

/// A candidate pair of near-duplicate memories, sorted descending by score.
#[derive(Debug, Clone)]
pub struct SimilarPair {
    pub a: String,
    pub b: String,
    pub score: f64,
}

/// A proposed merge of two memories, ready for `Consolidator::consolidate`.
#[derive(Debug, Clone)]
pub struct ConsolidationSuggestion {
    pub sources: [String; 2],
    pub score: f64,
    pub suggested_content: String,
    pub memory_type: MemoryType,
}

/// The outcome of a successful merge.
#[derive(Debug, Clone)]
pub struct ConsolidateResult {
    pub new_memory: Memory,
    pub archived_memories: Vec<String>,
    pub version_ids: Vec<String>,
}
