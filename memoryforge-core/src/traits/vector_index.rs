use serde::{Deserialize, Serialize};

use crate::errors::MemoryForgeResult;
use crate::memory::MemoryType;

/// Payload stored alongside a vector, returned verbatim on search hits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPayload {
    pub memory_type: MemoryType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub project_id: String,
}

/// A single nearest-neighbor hit: the memory id, its cosine similarity score
/// in `[-1, 1]`, and the payload it was stored with.
pub type VectorHit = (String, f32, VectorPayload);

/// Stores `(memory_id, vector, payload)` triples per project and serves
/// top-K cosine nearest-neighbor search with an optional type filter.
pub trait VectorIndex: Send + Sync {
    /// Insert or overwrite the vector for `memory_id`.
    fn upsert(&self, memory_id: &str, vector: &[f32], payload: VectorPayload) -> MemoryForgeResult<()>;

    /// Remove `memory_id` from the index. A no-op if absent.
    fn delete(&self, memory_id: &str) -> MemoryForgeResult<()>;

    /// Return up to `k` nearest neighbors to `query`, optionally filtered to
    /// a single memory type, with a minimum cosine-similarity threshold.
    fn search(
        &self,
        query: &[f32],
        k: usize,
        type_filter: Option<MemoryType>,
        min_score: f32,
    ) -> MemoryForgeResult<Vec<VectorHit>>;

    /// Number of vectors currently stored.
    fn count(&self) -> MemoryForgeResult<usize>;

    /// Drop and recreate the index from scratch. Used on dimension mismatch
    /// and as the supported repair for an orphaned-vector failure window.
    fn rebuild(&self) -> MemoryForgeResult<()>;

    /// The dimension vectors in this index were created with, if any are stored.
    fn dimension(&self) -> MemoryForgeResult<Option<usize>>;
}
