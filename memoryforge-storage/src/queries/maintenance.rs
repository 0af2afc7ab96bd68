//! Vacuum and a storage health snapshot, surfaced by the observability crate.

use rusqlite::Connection;

use memoryforge_core::errors::MemoryForgeResult;

use crate::map_err;

/// Reclaim free pages. Safe to run at any time; blocks writers for its duration.
pub fn vacuum(conn: &Connection) -> MemoryForgeResult<()> {
    conn.execute_batch("VACUUM;").map_err(map_err)
}

/// A point-in-time snapshot of database size and row counts.
#[derive(Debug, Clone)]
pub struct StorageHealthReport {
    pub active_memories: u64,
    pub archived_memories: u64,
    pub total_relations: u64,
    pub page_count: u64,
    pub page_size: u64,
    pub freelist_count: u64,
}

impl StorageHealthReport {
    pub fn estimated_db_size_bytes(&self) -> u64 {
        self.page_count * self.page_size
    }

    pub fn fragmentation_pct(&self) -> f64 {
        if self.page_count == 0 {
            return 0.0;
        }
        (self.freelist_count as f64 / self.page_count as f64) * 100.0
    }
}

pub fn report(conn: &Connection) -> MemoryForgeResult<StorageHealthReport> {
    let active_memories: i64 = conn
        .query_row("SELECT COUNT(*) FROM memories WHERE is_archived = 0", [], |row| {
            row.get(0)
        })
        .map_err(map_err)?;
    let archived_memories: i64 = conn
        .query_row("SELECT COUNT(*) FROM memories WHERE is_archived = 1", [], |row| {
            row.get(0)
        })
        .map_err(map_err)?;
    let total_relations: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_relations", [], |row| row.get(0))
        .unwrap_or(0);
    let page_count: u64 = conn
        .pragma_query_value(None, "page_count", |row| row.get(0))
        .map_err(map_err)?;
    let page_size: u64 = conn
        .pragma_query_value(None, "page_size", |row| row.get(0))
        .map_err(map_err)?;
    let freelist_count: u64 = conn
        .pragma_query_value(None, "freelist_count", |row| row.get(0))
        .map_err(map_err)?;

    Ok(StorageHealthReport {
        active_memories: active_memories as u64,
        archived_memories: archived_memories as u64,
        total_relations: total_relations as u64,
        page_count,
        page_size,
        freelist_count,
    })
}
