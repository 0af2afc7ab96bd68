//! Memory lifecycle orchestration: validate, create unconfirmed, confirm
//! (embed + index), update (re-embed if confirmed), delete (de-index first).

use chrono::Utc;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::{Memory, MemorySource, MemoryType};
use memoryforge_core::traits::{EmbeddingProvider, ListMemoriesFilter, MemoryStorage, VectorIndex, VectorPayload};
use memoryforge_core::validation::{sanitize, validate_content};

/// Orchestrates the relational store, the vector index, and the embedding
/// provider for every memory-level write. Read-only calls are thin
/// pass-throughs straight to storage.
pub struct MemoryManager<'a> {
    storage: &'a dyn MemoryStorage,
    vector: &'a dyn VectorIndex,
    embedder: &'a dyn EmbeddingProvider,
}

impl<'a> MemoryManager<'a> {
    pub fn new(storage: &'a dyn MemoryStorage, vector: &'a dyn VectorIndex, embedder: &'a dyn EmbeddingProvider) -> Self {
        Self { storage, vector, embedder }
    }

    /// Sanitize and validate `content`, create an unconfirmed memory, and
    /// optionally confirm it immediately.
    pub fn create_memory(
        &self,
        project_id: &str,
        content: &str,
        memory_type: MemoryType,
        source: MemorySource,
        auto_confirm: bool,
        metadata: Value,
    ) -> MemoryForgeResult<Memory> {
        let cleaned = sanitize(content);
        validate_content(&cleaned)?;

        let mut memory = Memory::new(Uuid::new_v4().to_string(), project_id.to_string(), cleaned, memory_type, source, Utc::now());
        memory.metadata = metadata;
        self.storage.create_memory(&memory)?;

        if auto_confirm {
            self.confirm_memory(&memory.id)?;
            memory.confirmed = true;
            memory.updated_at = Some(memory.created_at);
        }

        Ok(memory)
    }

    /// Embed, index, and confirm a memory. A no-op returning `Ok(true)` if
    /// the memory is already confirmed. Any failure before the final
    /// `confirm_memory` call leaves the memory unconfirmed: the vector write
    /// and the embedding reference are both safe to retry.
    pub fn confirm_memory(&self, id: &str) -> MemoryForgeResult<bool> {
        memoryforge_observability::confirm_memory_span!(id).in_scope(|| self.confirm_memory_inner(id))
    }

    fn confirm_memory_inner(&self, id: &str) -> MemoryForgeResult<bool> {
        let memory = self.storage.get_memory(id)?.ok_or_else(|| MemoryForgeError::NotFound(id.to_string()))?;
        if memory.confirmed {
            return Ok(true);
        }

        let embedding = self.embedder.generate(&memory.content)?;
        self.vector.upsert(
            id,
            &embedding,
            VectorPayload {
                memory_type: memory.memory_type,
                created_at: memory.created_at,
                project_id: memory.project_id.clone(),
            },
        )?;
        self.storage.save_embedding_reference(id, id)?;
        self.storage.confirm_memory(id, Utc::now())?;
        Ok(true)
    }

    /// Sanitize, validate, and persist new content. If the memory is
    /// currently confirmed, re-embeds and re-upserts under the same vector
    /// id; a failure in that step is logged and swallowed, since the
    /// content update itself has already succeeded.
    pub fn update_memory(&self, id: &str, content: &str) -> MemoryForgeResult<()> {
        let cleaned = sanitize(content);
        validate_content(&cleaned)?;

        let memory = self.storage.get_memory(id)?.ok_or_else(|| MemoryForgeError::NotFound(id.to_string()))?;
        let now = Utc::now();
        self.storage.update_memory(id, &cleaned, now)?;

        if memory.confirmed {
            if let Err(err) = self.re_embed(id, &memory, &cleaned, now) {
                warn!(memory_id = id, error = %err, "failed to re-embed updated memory; content update retained");
            }
        }

        Ok(())
    }

    fn re_embed(&self, id: &str, memory: &Memory, content: &str, now: chrono::DateTime<Utc>) -> MemoryForgeResult<()> {
        let embedding = self.embedder.generate(content)?;
        self.vector.upsert(
            id,
            &embedding,
            VectorPayload {
                memory_type: memory.memory_type,
                created_at: now,
                project_id: memory.project_id.clone(),
            },
        )
    }

    /// De-index (if confirmed) then delete. Idempotent: returns `Ok(false)`
    /// for an id that doesn't exist.
    pub fn delete_memory(&self, id: &str) -> MemoryForgeResult<bool> {
        let Some(memory) = self.storage.get_memory(id)? else {
            return Ok(false);
        };
        if memory.confirmed {
            self.vector.delete(id)?;
        }
        self.storage.delete_memory(id)
    }

    pub fn list_memories(&self, project_id: &str, filter: &ListMemoriesFilter) -> MemoryForgeResult<Vec<Memory>> {
        self.storage.list_memories(project_id, filter)
    }

    pub fn get_memory_count(&self, project_id: &str, confirmed_only: bool) -> MemoryForgeResult<u64> {
        self.storage.get_memory_count(project_id, confirmed_only)
    }
}
