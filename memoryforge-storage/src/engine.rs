//! `StorageEngine`: the `MemoryStorage` (R) implementation backing the rest
//! of the workspace. One serialized writer, a round-robin pool of readers
//! that are never blocked by a write thanks to WAL mode.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::{ConflictLogEntry, Memory, MemoryLink, MemoryRelation, Project, MemoryVersion};
use memoryforge_core::traits::{ListMemoriesFilter, MemoryStorage, RelationDirection};

use crate::migrations;
use crate::pool::{ConnectionPool, DEFAULT_POOL_SIZE};
use crate::queries::{conflict_ops, link_ops, memory_crud, memory_query, project_ops, relation_ops, version_ops};

pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open (creating and migrating to the latest schema if necessary) the
    /// database at `path`.
    pub fn open(path: &Path) -> MemoryForgeResult<Self> {
        migrations::run_migration(path, true, None)?;
        let pool = ConnectionPool::open(path, DEFAULT_POOL_SIZE)?;
        Ok(Self { pool })
    }

    /// An in-memory engine, schema already at the latest version. Intended
    /// for tests: the reader pool does not see the writer's data, so use
    /// `with_writer` for both sides in single-threaded tests.
    pub fn open_in_memory() -> MemoryForgeResult<Self> {
        let pool = ConnectionPool::open_in_memory(DEFAULT_POOL_SIZE)?;
        pool.writer.with_conn(migrations::init_fresh_schema)?;
        Ok(Self { pool })
    }

    fn with_reader<F, T>(&self, f: F) -> MemoryForgeResult<T>
    where
        F: FnOnce(&Connection) -> MemoryForgeResult<T>,
    {
        if self.pool.db_path.is_some() {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }
}

impl MemoryStorage for StorageEngine {
    fn create_project(&self, project: &Project) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| project_ops::create_project(conn, project))
    }

    fn get_project(&self, id: &str) -> MemoryForgeResult<Option<Project>> {
        self.with_reader(|conn| project_ops::get_project(conn, id))
    }

    fn get_project_by_name(&self, name: &str) -> MemoryForgeResult<Option<Project>> {
        self.with_reader(|conn| project_ops::get_project_by_name(conn, name))
    }

    fn list_projects(&self) -> MemoryForgeResult<Vec<Project>> {
        self.with_reader(project_ops::list_projects)
    }

    fn delete_project(&self, id: &str) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| project_ops::delete_project(conn, id))
    }

    fn create_memory(&self, memory: &Memory) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| memory_crud::insert_memory(conn, memory))
    }

    fn get_memory(&self, id: &str) -> MemoryForgeResult<Option<Memory>> {
        self.with_reader(|conn| memory_crud::get_memory(conn, id))
    }

    fn update_memory(&self, id: &str, content: &str, now: DateTime<Utc>) -> MemoryForgeResult<()> {
        self.pool
            .writer
            .with_conn(|conn| memory_crud::update_memory_content(conn, id, content, now))
    }

    fn delete_memory(&self, id: &str) -> MemoryForgeResult<bool> {
        self.pool.writer.with_conn(|conn| memory_crud::delete_memory(conn, id))
    }

    fn confirm_memory(&self, id: &str, now: DateTime<Utc>) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| memory_crud::confirm_memory(conn, id, now))
    }

    fn list_memories(&self, project_id: &str, filter: &ListMemoriesFilter) -> MemoryForgeResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::list_memories(conn, project_id, filter))
    }

    fn get_recent_memories(&self, project_id: &str, limit: u32) -> MemoryForgeResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::get_recent_memories(conn, project_id, limit))
    }

    fn get_memory_count(&self, project_id: &str, confirmed_only: bool) -> MemoryForgeResult<u64> {
        self.with_reader(|conn| memory_query::get_memory_count(conn, project_id, confirmed_only))
    }

    fn save_embedding_reference(&self, memory_id: &str, vector_id: &str) -> MemoryForgeResult<()> {
        self.pool
            .writer
            .with_conn(|conn| link_ops::save_embedding_reference(conn, memory_id, vector_id))
    }

    fn get_embedding_reference(&self, memory_id: &str) -> MemoryForgeResult<Option<String>> {
        self.with_reader(|conn| link_ops::get_embedding_reference(conn, memory_id))
    }

    fn delete_embedding_reference(&self, memory_id: &str) -> MemoryForgeResult<()> {
        self.pool
            .writer
            .with_conn(|conn| link_ops::delete_embedding_reference(conn, memory_id))
    }

    fn get_next_version_number(&self, memory_id: &str) -> MemoryForgeResult<u32> {
        self.with_reader(|conn| version_ops::get_next_version_number(conn, memory_id))
    }

    fn save_memory_version(&self, version: &MemoryVersion) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| version_ops::save_memory_version(conn, version))
    }

    fn get_memory_versions(&self, memory_id: &str) -> MemoryForgeResult<Vec<MemoryVersion>> {
        self.with_reader(|conn| version_ops::get_memory_versions(conn, memory_id))
    }

    fn create_memory_link(&self, link: &MemoryLink) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| link_ops::create_memory_link(conn, link))
    }

    fn get_memories_by_commit(&self, commit_sha: &str) -> MemoryForgeResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::get_memories_by_commit(conn, commit_sha))
    }

    fn get_memory_links(&self, memory_id: &str) -> MemoryForgeResult<Vec<MemoryLink>> {
        self.with_reader(|conn| link_ops::get_memory_links(conn, memory_id))
    }

    fn create_memory_relation(&self, relation: &MemoryRelation) -> MemoryForgeResult<()> {
        self.pool
            .writer
            .with_conn(|conn| relation_ops::create_memory_relation(conn, relation))
    }

    fn get_memory_relations(
        &self,
        memory_id: &str,
        direction: RelationDirection,
    ) -> MemoryForgeResult<Vec<MemoryRelation>> {
        self.with_reader(|conn| relation_ops::get_memory_relations(conn, memory_id, direction))
    }

    fn delete_memory_relation(&self, relation_id: &str) -> MemoryForgeResult<()> {
        self.pool
            .writer
            .with_conn(|conn| relation_ops::delete_memory_relation(conn, relation_id))
    }

    fn mark_stale(&self, id: &str, reason: &str) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| memory_crud::mark_stale(conn, id, reason))
    }

    fn clear_stale(&self, id: &str) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| memory_crud::clear_stale(conn, id))
    }

    fn get_stale_memories(&self, project_id: &str) -> MemoryForgeResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::get_stale_memories(conn, project_id))
    }

    fn archive_memory(&self, id: &str, consolidated_into: &str) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| {
            if memory_crud::is_archived(conn, id)?.unwrap_or(false) {
                return Err(memoryforge_core::errors::MemoryForgeError::Conflict(format!(
                    "memory {id} is already archived"
                )));
            }
            let target = if consolidated_into.is_empty() {
                None
            } else {
                Some(consolidated_into)
            };
            memory_crud::archive_memory(conn, id, target)
        })
    }

    fn restore_archived_memory(&self, id: &str) -> MemoryForgeResult<()> {
        self.pool
            .writer
            .with_conn(|conn| memory_crud::restore_archived_memory(conn, id))
    }

    fn get_archived_memories(&self, consolidated_into: &str) -> MemoryForgeResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::get_archived_memories(conn, consolidated_into))
    }

    fn get_all_archived_memories(&self, project_id: &str) -> MemoryForgeResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::get_all_archived_memories(conn, project_id))
    }

    fn update_last_accessed(&self, id: &str, now: DateTime<Utc>) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| memory_crud::update_last_accessed(conn, id, now))
    }

    fn update_confidence_score(&self, id: &str, score: f64) -> MemoryForgeResult<()> {
        self.pool
            .writer
            .with_conn(|conn| memory_crud::update_confidence_score(conn, id, score))
    }

    fn get_low_confidence_memories(&self, project_id: &str, threshold: f64) -> MemoryForgeResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::get_low_confidence_memories(conn, project_id, threshold))
    }

    fn log_conflict(&self, entry: &ConflictLogEntry) -> MemoryForgeResult<()> {
        self.pool.writer.with_conn(|conn| conflict_ops::log_conflict(conn, entry))
    }

    fn get_conflict_history(&self, memory_id: Option<&str>) -> MemoryForgeResult<Vec<ConflictLogEntry>> {
        self.with_reader(|conn| conflict_ops::get_conflict_history(conn, memory_id))
    }

    fn get_schema_version(&self) -> MemoryForgeResult<u32> {
        self.with_reader(migrations::get_schema_version)
    }

    fn set_schema_version(&self, version: u32, description: Option<&str>) -> MemoryForgeResult<()> {
        self.pool
            .writer
            .with_conn(|conn| migrations::set_schema_version(conn, version, description))
    }
}
