//! Memory version snapshots, taken by the consolidator before archiving.

use rusqlite::{params, Connection};

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::MemoryVersion;

use crate::map_err;

/// `max(version) + 1`, or `1` if no versions exist yet for `memory_id`.
pub fn get_next_version_number(conn: &Connection, memory_id: &str) -> MemoryForgeResult<u32> {
    let max: Option<u32> = conn
        .query_row(
            "SELECT MAX(version) FROM memory_versions WHERE memory_id = ?1",
            params![memory_id],
            |row| row.get(0),
        )
        .map_err(map_err)?;
    Ok(max.map(|v| v + 1).unwrap_or(1))
}

pub fn save_memory_version(conn: &Connection, version: &MemoryVersion) -> MemoryForgeResult<()> {
    conn.execute(
        "INSERT INTO memory_versions (id, memory_id, content, version, created_at)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            version.id,
            version.memory_id,
            version.content,
            version.version,
            version.created_at.to_rfc3339(),
        ],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn get_memory_versions(conn: &Connection, memory_id: &str) -> MemoryForgeResult<Vec<MemoryVersion>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, memory_id, content, version, created_at FROM memory_versions
             WHERE memory_id = ?1 ORDER BY version DESC",
        )
        .map_err(map_err)?;
    let rows = stmt
        .query_map(params![memory_id], |row| {
            let created_at: String = row.get(4)?;
            Ok(MemoryVersion {
                id: row.get(0)?,
                memory_id: row.get(1)?,
                content: row.get(2)?,
                version: row.get(3)?,
                created_at: created_at.parse().unwrap_or_else(|_| chrono::Utc::now()),
            })
        })
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
