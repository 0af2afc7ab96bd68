//! v1 → v2: adds staleness/archival/versioning columns to `memories`, creates
//! `memory_versions`, `memory_links`, and the `schema_version` table itself.

use rusqlite::Connection;

use memoryforge_core::errors::MemoryForgeResult;

use crate::map_err;

pub fn migrate(conn: &Connection) -> MemoryForgeResult<()> {
    conn.execute_batch(
        "
        ALTER TABLE memories ADD COLUMN is_stale INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE memories ADD COLUMN stale_reason TEXT;
        ALTER TABLE memories ADD COLUMN is_archived INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE memories ADD COLUMN consolidated_into TEXT;

        CREATE TABLE memory_versions (
            id          TEXT PRIMARY KEY,
            memory_id   TEXT NOT NULL REFERENCES memories(id),
            content     TEXT NOT NULL,
            version     INTEGER NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX idx_memory_versions_memory_id ON memory_versions(memory_id);

        CREATE TABLE memory_links (
            id           TEXT PRIMARY KEY,
            memory_id    TEXT NOT NULL REFERENCES memories(id),
            commit_sha   TEXT NOT NULL,
            link_type    TEXT NOT NULL,
            created_at   TEXT NOT NULL
        );
        CREATE INDEX idx_memory_links_memory_id ON memory_links(memory_id);
        CREATE INDEX idx_memory_links_commit_sha ON memory_links(commit_sha);

        CREATE INDEX idx_memories_archived ON memories(is_archived);
        CREATE INDEX idx_memories_stale ON memories(is_stale);

        CREATE TABLE schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL,
            description TEXT
        );
        ",
    )
    .map_err(map_err)?;
    Ok(())
}
