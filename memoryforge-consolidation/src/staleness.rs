//! Staleness marking and the "unused" sweep that feeds auto-archival.

use chrono::{Duration, Utc};

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::Memory;
use memoryforge_core::traits::{ListMemoriesFilter, MemoryStorage, VectorIndex};

pub fn mark_stale(storage: &dyn MemoryStorage, id: &str, reason: &str) -> MemoryForgeResult<()> {
    storage.mark_stale(id, reason)
}

pub fn clear_stale(storage: &dyn MemoryStorage, id: &str) -> MemoryForgeResult<()> {
    storage.clear_stale(id)
}

pub fn get_stale_memories(storage: &dyn MemoryStorage, project_id: &str) -> MemoryForgeResult<Vec<Memory>> {
    storage.get_stale_memories(project_id)
}

/// A memory is "unused" if it hasn't been touched by a search hit in
/// `days`: either `last_accessed` predates the cutoff, or it was never
/// accessed at all and was created before the cutoff.
pub fn find_unused_memories(
    storage: &dyn MemoryStorage,
    project_id: &str,
    days: i64,
) -> MemoryForgeResult<Vec<Memory>> {
    let cutoff = Utc::now() - Duration::days(days);
    let memories = storage.list_memories(
        project_id,
        &ListMemoriesFilter {
            include_archived: false,
            ..Default::default()
        },
    )?;

    Ok(memories
        .into_iter()
        .filter(|memory| match memory.last_accessed {
            Some(last_accessed) => last_accessed < cutoff,
            None => memory.created_at < cutoff,
        })
        .collect())
}

/// Archive every memory `find_unused_memories` would return. With
/// `dry_run`, candidates are returned without being archived. Archival
/// uses `consolidated_into = None`: a plain archive with no successor,
/// distinct from a consolidation merge.
pub fn auto_archive_stale(
    storage: &dyn MemoryStorage,
    vector: &dyn VectorIndex,
    project_id: &str,
    days: i64,
    dry_run: bool,
) -> MemoryForgeResult<Vec<Memory>> {
    let candidates = find_unused_memories(storage, project_id, days)?;
    if dry_run {
        return Ok(candidates);
    }

    for memory in &candidates {
        storage.archive_memory(&memory.id, "")?;
        vector.delete(&memory.id)?;
    }

    Ok(candidates)
}
