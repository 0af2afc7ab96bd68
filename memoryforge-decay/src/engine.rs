//! `ConfidenceScorer`: persists the formula's output against storage.

use chrono::Utc;

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::Memory;
use memoryforge_core::traits::{ListMemoriesFilter, MemoryStorage};

use crate::formula;

const BATCH_CAP: u32 = 10_000;

pub struct ConfidenceScorer<'a> {
    storage: &'a dyn MemoryStorage,
}

impl<'a> ConfidenceScorer<'a> {
    pub fn new(storage: &'a dyn MemoryStorage) -> Self {
        Self { storage }
    }

    fn score_for(&self, memory: &Memory) -> MemoryForgeResult<f64> {
        let conflicts = self.storage.get_conflict_history(Some(&memory.id))?;
        Ok(formula::compute(
            memory.confirmed,
            memory.created_at,
            memory.last_accessed,
            conflicts.len() as u32,
            Utc::now(),
        ))
    }

    /// Recompute and persist the confidence score for one memory.
    pub fn update_score(&self, memory_id: &str) -> MemoryForgeResult<f64> {
        let memory = self
            .storage
            .get_memory(memory_id)?
            .ok_or_else(|| memoryforge_core::errors::MemoryForgeError::NotFound(memory_id.to_string()))?;
        let score = self.score_for(&memory)?;
        self.storage.update_confidence_score(memory_id, score)?;
        Ok(score)
    }

    /// Recompute and persist confidence for every memory in a project,
    /// capped at 10,000 memories per call.
    pub fn batch_update_scores(&self, project_id: &str) -> MemoryForgeResult<usize> {
        let memories = self.storage.list_memories(
            project_id,
            &ListMemoriesFilter {
                include_archived: true,
                limit: Some(BATCH_CAP),
                ..Default::default()
            },
        )?;

        for memory in &memories {
            let score = self.score_for(memory)?;
            self.storage.update_confidence_score(&memory.id, score)?;
        }

        Ok(memories.len())
    }

    pub fn get_low_confidence(&self, project_id: &str, threshold: f64) -> MemoryForgeResult<Vec<Memory>> {
        self.storage.get_low_confidence_memories(project_id, threshold)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use memoryforge_core::memory::{MemorySource, MemoryType, Project};

    use super::*;

    fn fixture() -> (memoryforge_storage::StorageEngine, tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let storage = memoryforge_storage::StorageEngine::open(&dir.path().join("memoryforge.sqlite")).unwrap();
        let project = Project {
            id: "p1".into(),
            name: "demo".into(),
            root_path: "/tmp/demo".into(),
            created_at: Utc::now(),
        };
        storage.create_project(&project).unwrap();
        (storage, dir, project.id)
    }

    #[test]
    fn update_score_persists_the_computed_value() {
        let (storage, _dir, project_id) = fixture();
        let mut memory = Memory::new("m1".into(), project_id.clone(), "content".into(), MemoryType::Note, MemorySource::Manual, Utc::now() - Duration::days(60));
        memory.confirmed = true;
        storage.create_memory(&memory).unwrap();

        let scorer = ConfidenceScorer::new(&storage);
        let score = scorer.update_score("m1").unwrap();

        let stored = storage.get_memory("m1").unwrap().unwrap();
        assert!((stored.confidence_score.value() - score).abs() < 1e-9);
    }

    #[test]
    fn batch_update_scores_covers_every_memory_in_the_project() {
        let (storage, _dir, project_id) = fixture();
        for id in ["m1", "m2", "m3"] {
            let memory = Memory::new(id.into(), project_id.clone(), "content".into(), MemoryType::Note, MemorySource::Manual, Utc::now());
            storage.create_memory(&memory).unwrap();
        }

        let scorer = ConfidenceScorer::new(&storage);
        let updated = scorer.batch_update_scores(&project_id).unwrap();
        assert_eq!(updated, 3);
    }

    #[test]
    fn get_low_confidence_passes_through_to_storage() {
        let (storage, _dir, project_id) = fixture();
        let mut memory = Memory::new("m1".into(), project_id.clone(), "content".into(), MemoryType::Note, MemorySource::Manual, Utc::now());
        memory.confidence_score = 0.1.into();
        storage.create_memory(&memory).unwrap();

        let scorer = ConfidenceScorer::new(&storage);
        let low = scorer.get_low_confidence(&project_id, 0.5).unwrap();
        assert_eq!(low.len(), 1);
    }
}
