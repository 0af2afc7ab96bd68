use memoryforge_core::memory::{Memory, MemoryType};

/// Options narrowing a [`crate::RetrievalEngine::search`] call. `limit` and
/// `min_score` fall back to the engine's configured defaults when `None`.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub memory_type: Option<MemoryType>,
    pub limit: Option<u32>,
    pub min_score: Option<f64>,
    pub exclude_stale: bool,
    pub confirmed_only: bool,
}

/// One ranked hit, with the explanation text shown to the caller.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub memory: Memory,
    pub score: f64,
    pub explanation: String,
}
