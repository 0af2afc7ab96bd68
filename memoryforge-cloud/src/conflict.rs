//! Conflict detection and resolution for memories touched by both a local
//! writer and a sync pull.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::{ConflictLogEntry, Memory, Resolution};
use memoryforge_core::traits::MemoryStorage;

/// A detected divergence between a local memory and an incoming remote copy.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub memory_id: String,
    pub local_content: Option<String>,
    pub remote_content: String,
    pub local_timestamp: Option<DateTime<Utc>>,
    pub remote_timestamp: DateTime<Utc>,
}

/// No local memory means nothing to conflict with; identical content means
/// the remote write carried no new information.
pub fn detect_conflict(
    local: Option<&Memory>,
    remote_content: &str,
    remote_updated_at: DateTime<Utc>,
) -> Option<Conflict> {
    let local = local?;
    if local.content == remote_content {
        return None;
    }
    let local_timestamp = local.updated_at.unwrap_or(local.created_at);
    if remote_updated_at == local_timestamp {
        return None;
    }
    Some(Conflict {
        memory_id: local.id.clone(),
        local_content: Some(local.content.clone()),
        remote_content: remote_content.to_string(),
        local_timestamp: Some(local_timestamp),
        remote_timestamp: remote_updated_at,
    })
}

/// Which strategy to apply when resolving a conflict. Mirrors the four
/// dispatcher arms below; useful when the caller selects a strategy by
/// configuration rather than calling a named method directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStrategy {
    #[default]
    LastWriteWins,
    LocalWins,
    RemoteWins,
}

pub struct ConflictResolver<'a> {
    storage: &'a dyn MemoryStorage,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(storage: &'a dyn MemoryStorage) -> Self {
        Self { storage }
    }

    /// Dispatch to one of the named resolution methods by strategy.
    /// `Manual` isn't representable here since it needs `merged_content`;
    /// call `resolve_manual` directly for that case.
    pub fn resolve(&self, conflict: &Conflict, strategy: ResolutionStrategy) -> MemoryForgeResult<Resolution> {
        match strategy {
            ResolutionStrategy::LastWriteWins => self.resolve_last_write_wins(conflict),
            ResolutionStrategy::LocalWins => {
                self.resolve_keep_local(conflict)?;
                Ok(Resolution::LocalWins)
            }
            ResolutionStrategy::RemoteWins => {
                self.resolve_keep_remote(conflict)?;
                Ok(Resolution::RemoteWins)
            }
        }
    }

    /// The side with the later timestamp wins. If remote wins, its content
    /// is written back through `update_memory`.
    pub fn resolve_last_write_wins(&self, conflict: &Conflict) -> MemoryForgeResult<Resolution> {
        let local_timestamp = conflict.local_timestamp.unwrap_or(conflict.remote_timestamp);
        let resolution = if conflict.remote_timestamp > local_timestamp {
            self.storage
                .update_memory(&conflict.memory_id, &conflict.remote_content, Utc::now())?;
            Resolution::RemoteWins
        } else {
            Resolution::LocalWins
        };
        self.log(conflict, resolution, None)?;
        Ok(resolution)
    }

    /// Apply a caller-supplied merge of both sides.
    pub fn resolve_manual(&self, conflict: &Conflict, merged_content: &str, resolved_by: &str) -> MemoryForgeResult<()> {
        self.storage
            .update_memory(&conflict.memory_id, merged_content, Utc::now())?;
        self.log(conflict, Resolution::Manual, Some(resolved_by))
    }

    /// Keep the local content, discarding the remote write, without
    /// comparing timestamps.
    pub fn resolve_keep_local(&self, conflict: &Conflict) -> MemoryForgeResult<()> {
        self.log(conflict, Resolution::LocalWins, None)
    }

    /// Overwrite local with the remote content without comparing timestamps.
    pub fn resolve_keep_remote(&self, conflict: &Conflict) -> MemoryForgeResult<()> {
        self.storage
            .update_memory(&conflict.memory_id, &conflict.remote_content, Utc::now())?;
        self.log(conflict, Resolution::RemoteWins, None)
    }

    fn log(&self, conflict: &Conflict, resolution: Resolution, resolved_by: Option<&str>) -> MemoryForgeResult<()> {
        let entry = ConflictLogEntry::new(
            Uuid::new_v4().to_string(),
            conflict.memory_id.clone(),
            conflict.local_content.clone(),
            Some(conflict.remote_content.clone()),
            resolution,
            Utc::now(),
            resolved_by.map(str::to_string),
        );
        self.storage.log_conflict(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoryforge_core::memory::{MemorySource, MemoryType};

    fn memory(content: &str) -> Memory {
        Memory::new("m1".into(), "p1".into(), content.into(), MemoryType::Decision, MemorySource::Manual, Utc::now())
    }

    #[test]
    fn no_local_memory_means_no_conflict() {
        assert!(detect_conflict(None, "anything", Utc::now()).is_none());
    }

    #[test]
    fn identical_content_is_not_a_conflict() {
        let memory = memory("shared content");
        assert!(detect_conflict(Some(&memory), &memory.content, memory.created_at).is_none());
    }

    #[test]
    fn matching_timestamps_are_not_a_conflict() {
        let memory = memory("local content");
        assert!(detect_conflict(Some(&memory), "different content", memory.created_at).is_none());
    }

    #[test]
    fn diverging_content_and_timestamp_is_a_conflict() {
        let memory = memory("local content");
        let conflict = detect_conflict(Some(&memory), "remote content", Utc::now()).unwrap();
        assert_eq!(conflict.memory_id, memory.id);
    }
}
