//! Sync conflict history.

use rusqlite::{params, Connection};

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::{ConflictLogEntry, Resolution};

use crate::map_err;

fn resolution_to_str(r: Resolution) -> &'static str {
    match r {
        Resolution::LocalWins => "local_wins",
        Resolution::RemoteWins => "remote_wins",
        Resolution::Manual => "manual",
        Resolution::Merged => "merged",
    }
}

fn resolution_from_str(s: &str) -> Resolution {
    match s {
        "remote_wins" => Resolution::RemoteWins,
        "manual" => Resolution::Manual,
        "merged" => Resolution::Merged,
        _ => Resolution::LocalWins,
    }
}

pub fn log_conflict(conn: &Connection, entry: &ConflictLogEntry) -> MemoryForgeResult<()> {
    conn.execute(
        "INSERT INTO conflict_log
            (id, memory_id, local_content, remote_content, resolution, resolved_at, resolved_by)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            entry.id,
            entry.memory_id,
            entry.local_content,
            entry.remote_content,
            resolution_to_str(entry.resolution),
            entry.resolved_at.to_rfc3339(),
            entry.resolved_by,
        ],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn get_conflict_history(
    conn: &Connection,
    memory_id: Option<&str>,
) -> MemoryForgeResult<Vec<ConflictLogEntry>> {
    let mut stmt = if memory_id.is_some() {
        conn.prepare(
            "SELECT id, memory_id, local_content, remote_content, resolution, resolved_at, resolved_by
             FROM conflict_log WHERE memory_id = ?1 ORDER BY resolved_at DESC",
        )
    } else {
        conn.prepare(
            "SELECT id, memory_id, local_content, remote_content, resolution, resolved_at, resolved_by
             FROM conflict_log ORDER BY resolved_at DESC",
        )
    }
    .map_err(map_err)?;

    let map_row = |row: &rusqlite::Row| {
        let resolution: String = row.get(4)?;
        let resolved_at: String = row.get(5)?;
        Ok(ConflictLogEntry {
            id: row.get(0)?,
            memory_id: row.get(1)?,
            local_content: row.get(2)?,
            remote_content: row.get(3)?,
            resolution: resolution_from_str(&resolution),
            resolved_at: resolved_at.parse().unwrap_or_else(|_| chrono::Utc::now()),
            resolved_by: row.get(6)?,
        })
    };

    let rows = if let Some(id) = memory_id {
        stmt.query_map(params![id], map_row).map_err(map_err)?
    } else {
        stmt.query_map([], map_row).map_err(map_err)?
    };
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
