//! Merge and rollback: the write path that archives source memories behind
//! a freshly created consolidated one, and the inverse that undoes it.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::{Memory, MemorySource, MemoryType, MemoryVersion};
use memoryforge_core::traits::{EmbeddingProvider, MemoryStorage, VectorIndex, VectorPayload};

use crate::types::ConsolidateResult;

/// Merge `source_ids` (at least two, all confirmed, same project, none
/// already archived) into one new memory, snapshotting each source's
/// current content as a version before archiving it behind the merge.
///
/// If anything fails after the new memory and its versions have been
/// written, this makes a best-effort attempt to undo those writes rather
/// than leave a half-merged state; the original `Err` is always returned.
pub fn consolidate(
    storage: &dyn MemoryStorage,
    vector: &dyn VectorIndex,
    embedder: &dyn EmbeddingProvider,
    project_id: &str,
    source_ids: &[String],
    merged_content: &str,
    memory_type: Option<MemoryType>,
) -> MemoryForgeResult<ConsolidateResult> {
    memoryforge_observability::consolidate_span!(source_ids.len()).in_scope(|| {
        consolidate_inner(storage, vector, embedder, project_id, source_ids, merged_content, memory_type)
    })
}

fn consolidate_inner(
    storage: &dyn MemoryStorage,
    vector: &dyn VectorIndex,
    embedder: &dyn EmbeddingProvider,
    project_id: &str,
    source_ids: &[String],
    merged_content: &str,
    memory_type: Option<MemoryType>,
) -> MemoryForgeResult<ConsolidateResult> {
    if source_ids.len() < 2 {
        return Err(MemoryForgeError::validation(
            "source_ids",
            "consolidation requires at least two source memories",
        ));
    }

    let mut sources = Vec::with_capacity(source_ids.len());
    for id in source_ids {
        let memory = storage
            .get_memory(id)?
            .ok_or_else(|| MemoryForgeError::NotFound(id.clone()))?;
        if memory.project_id != project_id {
            return Err(MemoryForgeError::validation(
                "source_ids",
                format!("memory {id} does not belong to project {project_id}"),
            ));
        }
        if memory.is_archived {
            return Err(MemoryForgeError::Conflict(format!(
                "memory {id} is already archived"
            )));
        }
        sources.push(memory);
    }

    let now = Utc::now();
    let resolved_type = memory_type.unwrap_or(sources[0].memory_type);

    let mut new_memory = Memory::new(
        Uuid::new_v4().to_string(),
        project_id.to_string(),
        merged_content.to_string(),
        resolved_type,
        MemorySource::Manual,
        now,
    );
    new_memory.confirmed = true;

    let mut version_ids = Vec::with_capacity(sources.len());
    for memory in &sources {
        let version_number = storage.get_next_version_number(&memory.id)?;
        let version = MemoryVersion {
            id: Uuid::new_v4().to_string(),
            memory_id: memory.id.clone(),
            content: memory.content.clone(),
            version: version_number,
            created_at: now,
        };
        storage.save_memory_version(&version)?;
        version_ids.push(version.id);
    }

    let rollback_writes = |new_id: &str, written: &[String]| {
        for version_id in written {
            warn!(version_id, "leaving orphaned version snapshot after failed consolidation");
        }
        let _ = storage.delete_memory(new_id);
        let _ = vector.delete(new_id);
    };

    if let Err(err) = storage.create_memory(&new_memory) {
        rollback_writes(&new_memory.id, &version_ids);
        return Err(err);
    }

    let embedding = match embedder.generate(&new_memory.content) {
        Ok(vec) => vec,
        Err(err) => {
            rollback_writes(&new_memory.id, &version_ids);
            return Err(err);
        }
    };

    if let Err(err) = vector.upsert(
        &new_memory.id,
        &embedding,
        VectorPayload {
            memory_type: new_memory.memory_type,
            created_at: new_memory.created_at,
            project_id: project_id.to_string(),
        },
    ) {
        rollback_writes(&new_memory.id, &version_ids);
        return Err(err);
    }

    if let Err(err) = storage.save_embedding_reference(&new_memory.id, &new_memory.id) {
        rollback_writes(&new_memory.id, &version_ids);
        return Err(err);
    }

    let mut archived = Vec::with_capacity(sources.len());
    for memory in &sources {
        storage.archive_memory(&memory.id, &new_memory.id)?;
        vector.delete(&memory.id)?;
        archived.push(memory.id.clone());
    }

    Ok(ConsolidateResult {
        new_memory,
        archived_memories: archived,
        version_ids,
    })
}

/// Undo a consolidation: restore every source memory archived behind
/// `consolidated_id`, re-embed it, and delete the consolidated memory.
pub fn rollback_consolidation(
    storage: &dyn MemoryStorage,
    vector: &dyn VectorIndex,
    embedder: &dyn EmbeddingProvider,
    consolidated_id: &str,
) -> MemoryForgeResult<Vec<String>> {
    let archived = storage.get_archived_memories(consolidated_id)?;
    if archived.is_empty() {
        return Err(MemoryForgeError::NotFound(consolidated_id.to_string()));
    }

    let mut restored = Vec::with_capacity(archived.len());
    for memory in &archived {
        storage.restore_archived_memory(&memory.id)?;
        let embedding = embedder.generate(&memory.content)?;
        vector.upsert(
            &memory.id,
            &embedding,
            VectorPayload {
                memory_type: memory.memory_type,
                created_at: memory.created_at,
                project_id: memory.project_id.clone(),
            },
        )?;
        restored.push(memory.id.clone());
    }

    let _ = storage.delete_memory(consolidated_id);
    let _ = vector.delete(consolidated_id);

    Ok(restored)
}
