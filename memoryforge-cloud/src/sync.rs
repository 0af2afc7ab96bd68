//! Full-envelope push/pull sync over a `BlobStore`, with timestamp-based
//! conflict detection and a monotone archive/stale merge on pull.

use chrono::{DateTime, Duration, Utc};

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::traits::{BlobStore, ListMemoriesFilter, MemoryStorage};

use crate::crypto::SyncKey;
use crate::envelope::Envelope;

/// Pull treats remote and local as in sync within this tolerance, to avoid
/// spurious conflicts from near-simultaneous writes.
const CLOCK_SKEW_TOLERANCE: Duration = Duration::seconds(1);
const EXPORT_SCAN_LIMIT: u32 = 10_000;

#[derive(Debug, Default, Clone)]
pub struct PushResult {
    pub exported: usize,
    pub conflicts: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct PullResult {
    pub imported: usize,
    pub conflicts: Vec<String>,
    pub errors: Vec<String>,
}

pub struct SyncEngine<'a> {
    storage: &'a dyn MemoryStorage,
    blobs: &'a dyn BlobStore,
    key: &'a SyncKey,
}

impl<'a> SyncEngine<'a> {
    pub fn new(storage: &'a dyn MemoryStorage, blobs: &'a dyn BlobStore, key: &'a SyncKey) -> Self {
        Self { storage, blobs, key }
    }

    /// Export every memory (including archived) in `project_id` to the blob
    /// store. With `force`, remote conflict checks are skipped entirely.
    pub fn push(&self, project_id: &str, force: bool) -> MemoryForgeResult<PushResult> {
        memoryforge_observability::push_span!(project_id).in_scope(|| self.push_inner(project_id, force))
    }

    fn push_inner(&self, project_id: &str, force: bool) -> MemoryForgeResult<PushResult> {
        self.blobs.initialize()?;
        let mut result = PushResult::default();

        let filter = ListMemoriesFilter {
            include_archived: true,
            limit: Some(EXPORT_SCAN_LIMIT),
            ..Default::default()
        };
        let memories = self.storage.list_memories(project_id, &filter)?;

        for memory in &memories {
            let file_name = Envelope::file_name(&memory.id);
            let local_timestamp = memory.updated_at.unwrap_or(memory.created_at);

            if !force {
                match self.read_remote(&file_name) {
                    Ok(Some(remote)) if remote.updated_at > local_timestamp + CLOCK_SKEW_TOLERANCE => {
                        result.conflicts.push(memory.id.clone());
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        result.errors.push(format!("reading remote envelope for {}: {e}", memory.id));
                        continue;
                    }
                }
            }

            match Envelope::seal(memory, self.key).and_then(|e| e.to_bytes()) {
                Ok(bytes) => match self.blobs.write_file(&file_name, &bytes) {
                    Ok(()) => result.exported += 1,
                    Err(e) => result.errors.push(format!("writing envelope for {}: {e}", memory.id)),
                },
                Err(e) => result.errors.push(format!("sealing {}: {e}", memory.id)),
            }
        }

        Ok(result)
    }

    fn read_remote(&self, file_name: &str) -> MemoryForgeResult<Option<Envelope>> {
        if self.blobs.get_last_modified(file_name)?.is_none() {
            return Ok(None);
        }
        let bytes = self.blobs.read_file(file_name)?;
        Ok(Some(Envelope::from_bytes(&bytes)?))
    }

    /// Import every remote envelope belonging to `project_id`.
    pub fn pull(&self, project_id: &str, force: bool) -> MemoryForgeResult<PullResult> {
        memoryforge_observability::pull_span!(project_id).in_scope(|| self.pull_inner(project_id, force))
    }

    fn pull_inner(&self, project_id: &str, force: bool) -> MemoryForgeResult<PullResult> {
        let mut result = PullResult::default();

        for file_name in self.blobs.list_files()? {
            match self.pull_one(project_id, &file_name, force) {
                Ok(PullOutcome::Imported) => result.imported += 1,
                Ok(PullOutcome::Skipped) => {}
                Ok(PullOutcome::Conflict) => result.conflicts.push(file_name),
                Err(e) => result.errors.push(format!("importing {file_name}: {e}")),
            }
        }

        Ok(result)
    }

    fn pull_one(&self, project_id: &str, file_name: &str, force: bool) -> MemoryForgeResult<PullOutcome> {
        let bytes = self.blobs.read_file(file_name)?;
        let envelope = Envelope::from_bytes(&bytes)?;
        if envelope.project_id != project_id {
            return Ok(PullOutcome::Skipped);
        }
        let remote = envelope.open(self.key)?;
        let remote_timestamp = envelope.updated_at;

        let Some(local) = self.storage.get_memory(&remote.id)? else {
            self.storage.create_memory(&remote)?;
            return Ok(PullOutcome::Imported);
        };

        let local_timestamp = local.updated_at.unwrap_or(local.created_at);
        if !force && local_timestamp > remote_timestamp + CLOCK_SKEW_TOLERANCE {
            return Ok(PullOutcome::Conflict);
        }

        self.merge(&local.id, &local, &remote, remote_timestamp, local_timestamp)?;
        Ok(PullOutcome::Imported)
    }

    /// Archive/stale are monotone: once set on either side, they end up set
    /// locally. Content only moves when the remote copy is strictly newer.
    fn merge(
        &self,
        id: &str,
        local: &memoryforge_core::memory::Memory,
        remote: &memoryforge_core::memory::Memory,
        remote_timestamp: DateTime<Utc>,
        local_timestamp: DateTime<Utc>,
    ) -> MemoryForgeResult<()> {
        if remote.is_archived && !local.is_archived {
            self.storage
                .archive_memory(id, remote.consolidated_into.as_deref().unwrap_or(""))?;
        }
        if remote.is_stale && !local.is_stale {
            self.storage
                .mark_stale(id, remote.stale_reason.as_deref().unwrap_or("synced from remote"))?;
        }
        if remote_timestamp > local_timestamp && remote.content != local.content {
            self.storage.update_memory(id, &remote.content, remote_timestamp)?;
        }
        Ok(())
    }
}

enum PullOutcome {
    Imported,
    Skipped,
    Conflict,
}

