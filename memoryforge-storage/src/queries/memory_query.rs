//! Filtered and aggregate reads over memories.

use rusqlite::params;
use rusqlite::Connection;

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::Memory;
use memoryforge_core::traits::ListMemoriesFilter;

use crate::map_err;
use crate::queries::memory_crud::{memory_type_to_str, row_to_memory};

pub fn list_memories(
    conn: &Connection,
    project_id: &str,
    filter: &ListMemoriesFilter,
) -> MemoryForgeResult<Vec<Memory>> {
    let mut sql = String::from("SELECT * FROM memories WHERE project_id = ?1");
    if !filter.include_archived {
        sql.push_str(" AND is_archived = 0");
    }
    if filter.confirmed_only {
        sql.push_str(" AND confirmed = 1");
    }
    if let Some(memory_type) = filter.memory_type {
        sql.push_str(&format!(" AND type = '{}'", memory_type_to_str(memory_type)));
    }
    sql.push_str(" ORDER BY created_at DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
        if let Some(offset) = filter.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }

    let mut stmt = conn.prepare(&sql).map_err(map_err)?;
    let rows = stmt
        .query_map(params![project_id], row_to_memory)
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

pub fn get_recent_memories(conn: &Connection, project_id: &str, limit: u32) -> MemoryForgeResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare(
            "SELECT * FROM memories WHERE project_id = ?1 AND is_archived = 0
             ORDER BY created_at DESC LIMIT ?2",
        )
        .map_err(map_err)?;
    let rows = stmt
        .query_map(params![project_id, limit], row_to_memory)
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

pub fn get_memory_count(conn: &Connection, project_id: &str, confirmed_only: bool) -> MemoryForgeResult<u64> {
    let sql = if confirmed_only {
        "SELECT COUNT(*) FROM memories WHERE project_id = ?1 AND confirmed = 1"
    } else {
        "SELECT COUNT(*) FROM memories WHERE project_id = ?1"
    };
    conn.query_row(sql, params![project_id], |row| row.get::<_, i64>(0))
        .map_err(map_err)
        .map(|v| v as u64)
}

pub fn get_stale_memories(conn: &Connection, project_id: &str) -> MemoryForgeResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare("SELECT * FROM memories WHERE project_id = ?1 AND is_stale = 1 ORDER BY created_at DESC")
        .map_err(map_err)?;
    let rows = stmt
        .query_map(params![project_id], row_to_memory)
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

pub fn get_archived_memories(conn: &Connection, consolidated_into: &str) -> MemoryForgeResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare("SELECT * FROM memories WHERE consolidated_into = ?1 AND is_archived = 1")
        .map_err(map_err)?;
    let rows = stmt
        .query_map(params![consolidated_into], row_to_memory)
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

pub fn get_all_archived_memories(conn: &Connection, project_id: &str) -> MemoryForgeResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare("SELECT * FROM memories WHERE project_id = ?1 AND is_archived = 1 ORDER BY created_at DESC")
        .map_err(map_err)?;
    let rows = stmt
        .query_map(params![project_id], row_to_memory)
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

pub fn get_low_confidence_memories(
    conn: &Connection,
    project_id: &str,
    threshold: f64,
) -> MemoryForgeResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare(
            "SELECT * FROM memories WHERE project_id = ?1 AND confidence_score < ?2
             ORDER BY confidence_score ASC",
        )
        .map_err(map_err)?;
    let rows = stmt
        .query_map(params![project_id, threshold], row_to_memory)
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

pub fn get_memories_by_commit(conn: &Connection, commit_sha: &str) -> MemoryForgeResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare(
            "SELECT m.* FROM memories m
             JOIN memory_links l ON l.memory_id = m.id
             WHERE l.commit_sha = ?1",
        )
        .map_err(map_err)?;
    let rows = stmt
        .query_map(params![commit_sha], row_to_memory)
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
