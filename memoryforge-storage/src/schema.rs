//! The version-1 schema: the tables a brand-new database starts with before
//! any migration runs. Later schema versions are reached by running the
//! migrations in [`crate::migrations`] on top of this base.

use rusqlite::Connection;

use memoryforge_core::errors::MemoryForgeResult;

use crate::map_err;

pub const LATEST_SCHEMA_VERSION: u32 = 3;

/// Create the tables a version-1 database is expected to have.
pub fn create_v1_schema(conn: &Connection) -> MemoryForgeResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS projects (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL UNIQUE,
            root_path   TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS memories (
            id                 TEXT PRIMARY KEY,
            project_id         TEXT NOT NULL REFERENCES projects(id),
            content            TEXT NOT NULL,
            type               TEXT NOT NULL,
            source             TEXT NOT NULL,
            created_at         TEXT NOT NULL,
            updated_at         TEXT,
            confirmed          INTEGER NOT NULL DEFAULT 0,
            metadata           TEXT NOT NULL DEFAULT 'null',
            last_accessed      TEXT,
            content_hash       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS embedding_references (
            memory_id  TEXT PRIMARY KEY REFERENCES memories(id),
            vector_id  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memories_project ON memories(project_id);
        CREATE INDEX IF NOT EXISTS idx_memories_created_at ON memories(created_at);
        ",
    )
    .map_err(map_err)
}
