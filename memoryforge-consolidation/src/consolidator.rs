//! `Consolidator`: ties storage, the vector index, and an embedding
//! provider together behind a single-execution guard so `consolidate` and
//! `rollback_consolidation` can't interleave against the same process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::{Memory, MemoryType};
use memoryforge_core::traits::{EmbeddingProvider, MemoryStorage, VectorIndex};

use crate::lifecycle;
use crate::pairs;
use crate::staleness;
use crate::types::{ConsolidateResult, ConsolidationSuggestion, SimilarPair};

const DEFAULT_PAIR_SCAN_LIMIT: usize = 100;

pub struct Consolidator<'a> {
    storage: &'a dyn MemoryStorage,
    vector: &'a dyn VectorIndex,
    embedder: &'a dyn EmbeddingProvider,
    threshold: f64,
    is_running: Arc<AtomicBool>,
}

impl<'a> Consolidator<'a> {
    pub fn new(
        storage: &'a dyn MemoryStorage,
        vector: &'a dyn VectorIndex,
        embedder: &'a dyn EmbeddingProvider,
        threshold: f64,
    ) -> MemoryForgeResult<Self> {
        let min = memoryforge_core::constants::CONSOLIDATION_THRESHOLD_MIN;
        let max = memoryforge_core::constants::CONSOLIDATION_THRESHOLD_MAX;
        let clamped = threshold.clamp(min, max);
        if clamped != threshold {
            tracing::warn!(
                requested = threshold,
                clamped,
                min,
                max,
                "consolidation threshold out of range, clamping"
            );
        }
        Ok(Self {
            storage,
            vector,
            embedder,
            threshold: clamped,
            is_running: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    fn acquire(&self) -> MemoryForgeResult<()> {
        self.is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| MemoryForgeError::Conflict("a consolidation is already in progress".into()))
    }

    fn release(&self) {
        self.is_running.store(false, Ordering::SeqCst);
    }

    pub fn find_similar_pairs(&self, project_id: &str, limit: usize) -> MemoryForgeResult<Vec<SimilarPair>> {
        pairs::find_similar_pairs(self.storage, self.vector, self.embedder, project_id, self.threshold, limit)
    }

    pub fn suggest_consolidations(&self, project_id: &str, n: usize) -> MemoryForgeResult<Vec<ConsolidationSuggestion>> {
        let candidates = self.find_similar_pairs(project_id, DEFAULT_PAIR_SCAN_LIMIT.max(n))?;
        pairs::suggest_from_pairs(self.storage, &candidates, n)
    }

    pub fn consolidate(
        &self,
        project_id: &str,
        source_ids: &[String],
        merged_content: &str,
        memory_type: Option<MemoryType>,
    ) -> MemoryForgeResult<ConsolidateResult> {
        self.acquire()?;
        let result = lifecycle::consolidate(
            self.storage,
            self.vector,
            self.embedder,
            project_id,
            source_ids,
            merged_content,
            memory_type,
        );
        self.release();
        result
    }

    pub fn rollback_consolidation(&self, consolidated_id: &str) -> MemoryForgeResult<Vec<String>> {
        self.acquire()?;
        let result = lifecycle::rollback_consolidation(self.storage, self.vector, self.embedder, consolidated_id);
        self.release();
        result
    }

    pub fn mark_stale(&self, id: &str, reason: &str) -> MemoryForgeResult<()> {
        staleness::mark_stale(self.storage, id, reason)
    }

    pub fn clear_stale(&self, id: &str) -> MemoryForgeResult<()> {
        staleness::clear_stale(self.storage, id)
    }

    pub fn get_stale_memories(&self, project_id: &str) -> MemoryForgeResult<Vec<Memory>> {
        staleness::get_stale_memories(self.storage, project_id)
    }

    pub fn find_unused_memories(&self, project_id: &str, days: i64) -> MemoryForgeResult<Vec<Memory>> {
        staleness::find_unused_memories(self.storage, project_id, days)
    }

    pub fn auto_archive_stale(&self, project_id: &str, days: i64, dry_run: bool) -> MemoryForgeResult<Vec<Memory>> {
        staleness::auto_archive_stale(self.storage, self.vector, project_id, days, dry_run)
    }
}

#[cfg(test)]
mod tests {
    use memoryforge_core::memory::Project;
    use memoryforge_core::memory::{MemorySource, MemoryType};
    use memoryforge_core::traits::EmbeddingProvider;
    use memoryforge_embeddings::LocalProvider;
    use memoryforge_storage::{SqliteVectorIndex, StorageEngine};

    use super::*;

    fn fixture() -> (StorageEngine, SqliteVectorIndex, LocalProvider, tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::open(&dir.path().join("memoryforge.sqlite")).unwrap();
        let vector = SqliteVectorIndex::open(&dir.path().join("vectors"), "project-1").unwrap();
        let embedder = LocalProvider::new();
        let project = Project {
            id: "project-1".into(),
            name: "demo".into(),
            root_path: "/tmp/demo".into(),
            created_at: chrono::Utc::now(),
        };
        storage.create_project(&project).unwrap();
        (storage, vector, embedder, dir, project.id)
    }

    fn seed_memory(storage: &StorageEngine, vector: &SqliteVectorIndex, embedder: &LocalProvider, id: &str, project_id: &str, content: &str) {
        let memory = Memory::new(id.into(), project_id.into(), content.into(), MemoryType::Note, MemorySource::Manual, chrono::Utc::now());
        storage.create_memory(&memory).unwrap();
        let embedding = embedder.generate(content).unwrap();
        vector
            .upsert(
                &memory.id,
                &embedding,
                memoryforge_core::traits::VectorPayload {
                    memory_type: memory.memory_type,
                    created_at: memory.created_at,
                    project_id: project_id.to_string(),
                },
            )
            .unwrap();
    }

    #[test]
    fn clamps_an_out_of_range_threshold_instead_of_rejecting_it() {
        let (storage, vector, embedder, _dir, _project_id) = fixture();
        let below = Consolidator::new(&storage, &vector, &embedder, 0.5).unwrap();
        assert_eq!(below.threshold, memoryforge_core::constants::CONSOLIDATION_THRESHOLD_MIN);

        let above = Consolidator::new(&storage, &vector, &embedder, 1.5).unwrap();
        assert_eq!(above.threshold, memoryforge_core::constants::CONSOLIDATION_THRESHOLD_MAX);
    }

    #[test]
    fn consolidate_archives_sources_and_creates_a_merged_memory() {
        let (storage, vector, embedder, _dir, project_id) = fixture();
        seed_memory(&storage, &vector, &embedder, "m1", &project_id, "uses postgres");
        seed_memory(&storage, &vector, &embedder, "m2", &project_id, "uses postgres for storage");

        let consolidator = Consolidator::new(&storage, &vector, &embedder, 0.9).unwrap();
        let result = consolidator
            .consolidate(&project_id, &["m1".into(), "m2".into()], "uses postgres for storage", None)
            .unwrap();

        assert_eq!(result.archived_memories.len(), 2);
        assert_eq!(result.version_ids.len(), 2);
        assert!(storage.get_memory("m1").unwrap().unwrap().is_archived);
        assert!(storage.get_memory("m2").unwrap().unwrap().is_archived);
        assert!(!consolidator.is_running());
    }

    #[test]
    fn rollback_restores_archived_sources() {
        let (storage, vector, embedder, _dir, project_id) = fixture();
        seed_memory(&storage, &vector, &embedder, "m1", &project_id, "uses postgres");
        seed_memory(&storage, &vector, &embedder, "m2", &project_id, "uses postgres for storage");

        let consolidator = Consolidator::new(&storage, &vector, &embedder, 0.9).unwrap();
        let merge = consolidator
            .consolidate(&project_id, &["m1".into(), "m2".into()], "uses postgres for storage", None)
            .unwrap();

        let restored = consolidator.rollback_consolidation(&merge.new_memory.id).unwrap();
        assert_eq!(restored.len(), 2);
        assert!(!storage.get_memory("m1").unwrap().unwrap().is_archived);
        assert!(storage.get_memory(&merge.new_memory.id).unwrap().is_none());
    }

    #[test]
    fn rollback_fails_when_nothing_was_consolidated() {
        let (storage, vector, embedder, _dir, _project_id) = fixture();
        let consolidator = Consolidator::new(&storage, &vector, &embedder, 0.9).unwrap();
        assert!(consolidator.rollback_consolidation("does-not-exist").is_err());
    }
}
