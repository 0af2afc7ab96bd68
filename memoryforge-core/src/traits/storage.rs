use chrono::{DateTime, Utc};

use crate::errors::MemoryForgeResult;
use crate::memory::{
    ConflictLogEntry, LinkType, Memory, MemoryLink, MemoryRelation, MemoryType, MemoryVersion,
    Project, RelationOrigin, RelationType, Resolution,
};

/// Which direction to traverse when listing a memory's relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationDirection {
    Incoming,
    Outgoing,
    Both,
}

/// Filters accepted by `list_memories`. Archived memories are excluded by default.
#[derive(Debug, Clone, Default)]
pub struct ListMemoriesFilter {
    pub confirmed_only: bool,
    pub memory_type: Option<MemoryType>,
    pub include_archived: bool,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Durable, transactional storage of every entity in the data model, and
/// the sole owner of schema version. Readers must not be gated by writers
/// in the same process.
pub trait MemoryStorage: Send + Sync {
    // --- Project CRUD ---
    fn create_project(&self, project: &Project) -> MemoryForgeResult<()>;
    fn get_project(&self, id: &str) -> MemoryForgeResult<Option<Project>>;
    fn get_project_by_name(&self, name: &str) -> MemoryForgeResult<Option<Project>>;
    fn list_projects(&self) -> MemoryForgeResult<Vec<Project>>;
    /// Fails with `Conflict` if the project owns any memory, archived or not.
    fn delete_project(&self, id: &str) -> MemoryForgeResult<()>;

    // --- Memory CRUD ---
    fn create_memory(&self, memory: &Memory) -> MemoryForgeResult<()>;
    fn get_memory(&self, id: &str) -> MemoryForgeResult<Option<Memory>>;
    /// Updates `content` and `updated_at`.
    fn update_memory(&self, id: &str, content: &str, now: DateTime<Utc>) -> MemoryForgeResult<()>;
    /// Cascades to this memory's versions and links.
    fn delete_memory(&self, id: &str) -> MemoryForgeResult<bool>;
    /// Sets `confirmed = true` and `updated_at = now`. Idempotent.
    fn confirm_memory(&self, id: &str, now: DateTime<Utc>) -> MemoryForgeResult<()>;

    fn list_memories(
        &self,
        project_id: &str,
        filter: &ListMemoriesFilter,
    ) -> MemoryForgeResult<Vec<Memory>>;
    /// Newest-first, archived excluded.
    fn get_recent_memories(&self, project_id: &str, limit: u32) -> MemoryForgeResult<Vec<Memory>>;
    fn get_memory_count(&self, project_id: &str, confirmed_only: bool) -> MemoryForgeResult<u64>;

    // --- Embedding reference ---
    fn save_embedding_reference(&self, memory_id: &str, vector_id: &str) -> MemoryForgeResult<()>;
    fn get_embedding_reference(&self, memory_id: &str) -> MemoryForgeResult<Option<String>>;
    fn delete_embedding_reference(&self, memory_id: &str) -> MemoryForgeResult<()>;

    // --- Version API ---
    /// Returns `max(version) + 1`, or `1` if no versions exist yet.
    fn get_next_version_number(&self, memory_id: &str) -> MemoryForgeResult<u32>;
    fn save_memory_version(&self, version: &MemoryVersion) -> MemoryForgeResult<()>;
    /// Newest-first.
    fn get_memory_versions(&self, memory_id: &str) -> MemoryForgeResult<Vec<MemoryVersion>>;

    // --- Link API ---
    fn create_memory_link(&self, link: &MemoryLink) -> MemoryForgeResult<()>;
    fn get_memories_by_commit(&self, commit_sha: &str) -> MemoryForgeResult<Vec<Memory>>;
    fn get_memory_links(&self, memory_id: &str) -> MemoryForgeResult<Vec<MemoryLink>>;

    // --- Relation API ---
    /// Self-loops (`source == target`) are rejected with `Validation`.
    fn create_memory_relation(&self, relation: &MemoryRelation) -> MemoryForgeResult<()>;
    fn get_memory_relations(
        &self,
        memory_id: &str,
        direction: RelationDirection,
    ) -> MemoryForgeResult<Vec<MemoryRelation>>;
    fn delete_memory_relation(&self, relation_id: &str) -> MemoryForgeResult<()>;

    // --- Staleness / archival API ---
    fn mark_stale(&self, id: &str, reason: &str) -> MemoryForgeResult<()>;
    fn clear_stale(&self, id: &str) -> MemoryForgeResult<()>;
    fn get_stale_memories(&self, project_id: &str) -> MemoryForgeResult<Vec<Memory>>;
    /// Fails with `Conflict` if the memory is already archived.
    fn archive_memory(&self, id: &str, consolidated_into: &str) -> MemoryForgeResult<()>;
    fn restore_archived_memory(&self, id: &str) -> MemoryForgeResult<()>;
    fn get_archived_memories(&self, consolidated_into: &str) -> MemoryForgeResult<Vec<Memory>>;
    fn get_all_archived_memories(&self, project_id: &str) -> MemoryForgeResult<Vec<Memory>>;
    fn update_last_accessed(&self, id: &str, now: DateTime<Utc>) -> MemoryForgeResult<()>;

    // --- Confidence API ---
    fn update_confidence_score(&self, id: &str, score: f64) -> MemoryForgeResult<()>;
    fn get_low_confidence_memories(
        &self,
        project_id: &str,
        threshold: f64,
    ) -> MemoryForgeResult<Vec<Memory>>;

    // --- Conflict API ---
    fn log_conflict(&self, entry: &ConflictLogEntry) -> MemoryForgeResult<()>;
    fn get_conflict_history(
        &self,
        memory_id: Option<&str>,
    ) -> MemoryForgeResult<Vec<ConflictLogEntry>>;

    // --- Schema API ---
    /// Returns 1 if no version table exists yet.
    fn get_schema_version(&self) -> MemoryForgeResult<u32>;
    fn set_schema_version(&self, version: u32, description: Option<&str>) -> MemoryForgeResult<()>;
}

/// Convenience constructor so callers don't need to name every field.
impl MemoryRelation {
    pub fn new(
        id: String,
        source_memory_id: String,
        target_memory_id: String,
        relation_type: RelationType,
        created_at: DateTime<Utc>,
        created_by: RelationOrigin,
    ) -> MemoryForgeResult<Self> {
        if source_memory_id == target_memory_id {
            return Err(crate::errors::MemoryForgeError::validation(
                "target_memory_id",
                "a memory cannot relate to itself",
            ));
        }
        Ok(Self {
            id,
            source_memory_id,
            target_memory_id,
            relation_type,
            created_at,
            created_by,
        })
    }
}

impl MemoryLink {
    pub fn new(
        id: String,
        memory_id: String,
        commit_sha: String,
        link_type: LinkType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            memory_id,
            commit_sha,
            link_type,
            created_at,
        }
    }
}

impl ConflictLogEntry {
    pub fn new(
        id: String,
        memory_id: String,
        local_content: Option<String>,
        remote_content: Option<String>,
        resolution: Resolution,
        resolved_at: DateTime<Utc>,
        resolved_by: Option<String>,
    ) -> Self {
        Self {
            id,
            memory_id,
            local_content,
            remote_content,
            resolution,
            resolved_at,
            resolved_by,
        }
    }
}
