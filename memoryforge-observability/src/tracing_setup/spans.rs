//! One span macro per orchestration entry point: `confirm_memory`, `search`,
//! `consolidate`, `push`, `pull`, `run_migration`.

/// Span around `MemoryManager::confirm_memory`.
#[macro_export]
macro_rules! confirm_memory_span {
    ($memory_id:expr) => {
        tracing::info_span!("memoryforge.confirm_memory", memory_id = %$memory_id)
    };
}

/// Span around `RetrievalEngine::search`.
#[macro_export]
macro_rules! search_span {
    ($query:expr, $project_id:expr) => {
        tracing::info_span!("memoryforge.search", query = %$query, project_id = %$project_id)
    };
}

/// Span around `lifecycle::consolidate`.
#[macro_export]
macro_rules! consolidate_span {
    ($source_count:expr) => {
        tracing::info_span!("memoryforge.consolidate", source_count = $source_count)
    };
}

/// Span around `SyncEngine::push`.
#[macro_export]
macro_rules! push_span {
    ($project_id:expr) => {
        tracing::info_span!("memoryforge.push", project_id = %$project_id)
    };
}

/// Span around `SyncEngine::pull`.
#[macro_export]
macro_rules! pull_span {
    ($project_id:expr) => {
        tracing::info_span!("memoryforge.pull", project_id = %$project_id)
    };
}

/// Span around a migration runner applying one migration.
#[macro_export]
macro_rules! run_migration_span {
    ($version:expr) => {
        tracing::info_span!("memoryforge.run_migration", version = $version)
    };
}

/// Span names as constants, for callers that want to match or filter on them
/// instead of opening a span directly.
pub mod names {
    pub const CONFIRM_MEMORY: &str = "memoryforge.confirm_memory";
    pub const SEARCH: &str = "memoryforge.search";
    pub const CONSOLIDATE: &str = "memoryforge.consolidate";
    pub const PUSH: &str = "memoryforge.push";
    pub const PULL: &str = "memoryforge.pull";
    pub const RUN_MIGRATION: &str = "memoryforge.run_migration";
}
