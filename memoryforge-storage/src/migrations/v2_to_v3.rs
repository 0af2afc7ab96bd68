//! v2 → v3: creates `memory_relations` and `conflict_log`, adds
//! `confidence_score` (default 1.0), and the indexes retrieval leans on.

use rusqlite::Connection;

use memoryforge_core::errors::MemoryForgeResult;

use crate::map_err;

pub fn migrate(conn: &Connection) -> MemoryForgeResult<()> {
    conn.execute_batch(
        "
        ALTER TABLE memories ADD COLUMN confidence_score REAL NOT NULL DEFAULT 1.0;

        CREATE TABLE memory_relations (
            id                 TEXT PRIMARY KEY,
            source_memory_id   TEXT NOT NULL REFERENCES memories(id),
            target_memory_id   TEXT NOT NULL REFERENCES memories(id),
            relation_type      TEXT NOT NULL,
            created_at         TEXT NOT NULL,
            created_by         TEXT NOT NULL,
            CHECK (source_memory_id != target_memory_id)
        );
        CREATE INDEX idx_memory_relations_source ON memory_relations(source_memory_id);
        CREATE INDEX idx_memory_relations_target ON memory_relations(target_memory_id);

        CREATE TABLE conflict_log (
            id              TEXT PRIMARY KEY,
            memory_id       TEXT NOT NULL REFERENCES memories(id),
            local_content   TEXT,
            remote_content  TEXT,
            resolution      TEXT NOT NULL,
            resolved_at     TEXT NOT NULL,
            resolved_by     TEXT
        );
        CREATE INDEX idx_conflict_log_memory_id ON conflict_log(memory_id);

        CREATE INDEX idx_memories_confidence ON memories(confidence_score);
        CREATE INDEX idx_memories_confirmed ON memories(confirmed);
        ",
    )
    .map_err(map_err)?;
    Ok(())
}
