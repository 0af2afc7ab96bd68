//! Insert, update, get, delete for memories.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::{Confidence, Memory, MemorySource, MemoryType};

use crate::map_err;

pub fn memory_type_to_str(t: MemoryType) -> &'static str {
    t.as_str()
}

pub fn memory_type_from_str(s: &str) -> MemoryType {
    match s {
        "stack" => MemoryType::Stack,
        "decision" => MemoryType::Decision,
        "constraint" => MemoryType::Constraint,
        "convention" => MemoryType::Convention,
        _ => MemoryType::Note,
    }
}

fn source_to_str(s: MemorySource) -> &'static str {
    s.as_str()
}

fn source_from_str(s: &str) -> MemorySource {
    match s {
        "chat" => MemorySource::Chat,
        "manual" => MemorySource::Manual,
        "file_reference" => MemorySource::FileReference,
        _ => MemorySource::Git,
    }
}

fn parse_rfc3339(s: &str) -> DateTime<Utc> {
    s.parse().unwrap_or_else(|_| Utc::now())
}

pub fn row_to_memory(row: &Row) -> rusqlite::Result<Memory> {
    let metadata_raw: String = row.get("metadata")?;
    let metadata = serde_json::from_str(&metadata_raw).unwrap_or(serde_json::Value::Null);
    let memory_type: String = row.get("type")?;
    let source: String = row.get("source")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: Option<String> = row.get("updated_at")?;
    let last_accessed: Option<String> = row.get("last_accessed")?;

    Ok(Memory {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        content: row.get("content")?,
        memory_type: memory_type_from_str(&memory_type),
        source: source_from_str(&source),
        created_at: parse_rfc3339(&created_at),
        updated_at: updated_at.map(|s| parse_rfc3339(&s)),
        confirmed: row.get::<_, i64>("confirmed")? != 0,
        metadata,
        is_stale: row.get::<_, i64>("is_stale")? != 0,
        stale_reason: row.get("stale_reason")?,
        last_accessed: last_accessed.map(|s| parse_rfc3339(&s)),
        is_archived: row.get::<_, i64>("is_archived")? != 0,
        consolidated_into: row.get("consolidated_into")?,
        confidence_score: Confidence::new(row.get("confidence_score")?),
        content_hash: row.get("content_hash")?,
    })
}

pub fn insert_memory(conn: &Connection, memory: &Memory) -> MemoryForgeResult<()> {
    let metadata_json = serde_json::to_string(&memory.metadata)?;
    conn.execute(
        "INSERT INTO memories (
            id, project_id, content, type, source, created_at, updated_at,
            confirmed, metadata, is_stale, stale_reason, last_accessed,
            is_archived, consolidated_into, confidence_score, content_hash
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)",
        params![
            memory.id,
            memory.project_id,
            memory.content,
            memory_type_to_str(memory.memory_type),
            source_to_str(memory.source),
            memory.created_at.to_rfc3339(),
            memory.updated_at.map(|t| t.to_rfc3339()),
            memory.confirmed as i64,
            metadata_json,
            memory.is_stale as i64,
            memory.stale_reason,
            memory.last_accessed.map(|t| t.to_rfc3339()),
            memory.is_archived as i64,
            memory.consolidated_into,
            memory.confidence_score.value(),
            memory.content_hash,
        ],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn get_memory(conn: &Connection, id: &str) -> MemoryForgeResult<Option<Memory>> {
    conn.query_row("SELECT * FROM memories WHERE id = ?1", params![id], row_to_memory)
        .optional()
        .map_err(map_err)
}

pub fn update_memory_content(
    conn: &Connection,
    id: &str,
    content: &str,
    now: DateTime<Utc>,
) -> MemoryForgeResult<()> {
    let content_hash = Memory::compute_content_hash(content);
    conn.execute(
        "UPDATE memories SET content = ?1, content_hash = ?2, updated_at = ?3 WHERE id = ?4",
        params![content, content_hash, now.to_rfc3339(), id],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn confirm_memory(conn: &Connection, id: &str, now: DateTime<Utc>) -> MemoryForgeResult<()> {
    conn.execute(
        "UPDATE memories SET confirmed = 1, updated_at = ?1 WHERE id = ?2",
        params![now.to_rfc3339(), id],
    )
    .map_err(map_err)?;
    Ok(())
}

/// Deletes the memory row and cascades to its versions and links. Returns
/// whether a row was actually deleted.
pub fn delete_memory(conn: &Connection, id: &str) -> MemoryForgeResult<bool> {
    conn.execute("DELETE FROM memory_versions WHERE memory_id = ?1", params![id])
        .map_err(map_err)?;
    conn.execute("DELETE FROM memory_links WHERE memory_id = ?1", params![id])
        .map_err(map_err)?;
    conn.execute(
        "DELETE FROM embedding_references WHERE memory_id = ?1",
        params![id],
    )
    .map_err(map_err)?;
    let affected = conn
        .execute("DELETE FROM memories WHERE id = ?1", params![id])
        .map_err(map_err)?;
    Ok(affected > 0)
}

pub fn update_last_accessed(conn: &Connection, id: &str, now: DateTime<Utc>) -> MemoryForgeResult<()> {
    conn.execute(
        "UPDATE memories SET last_accessed = ?1 WHERE id = ?2",
        params![now.to_rfc3339(), id],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn update_confidence_score(conn: &Connection, id: &str, score: f64) -> MemoryForgeResult<()> {
    conn.execute(
        "UPDATE memories SET confidence_score = ?1 WHERE id = ?2",
        params![score, id],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn mark_stale(conn: &Connection, id: &str, reason: &str) -> MemoryForgeResult<()> {
    conn.execute(
        "UPDATE memories SET is_stale = 1, stale_reason = ?1 WHERE id = ?2",
        params![reason, id],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn clear_stale(conn: &Connection, id: &str) -> MemoryForgeResult<()> {
    conn.execute(
        "UPDATE memories SET is_stale = 0, stale_reason = NULL WHERE id = ?1",
        params![id],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn archive_memory(conn: &Connection, id: &str, consolidated_into: Option<&str>) -> MemoryForgeResult<()> {
    conn.execute(
        "UPDATE memories SET is_archived = 1, consolidated_into = ?1 WHERE id = ?2",
        params![consolidated_into, id],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn restore_archived_memory(conn: &Connection, id: &str) -> MemoryForgeResult<()> {
    conn.execute(
        "UPDATE memories SET is_archived = 0, consolidated_into = NULL WHERE id = ?1",
        params![id],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn is_archived(conn: &Connection, id: &str) -> MemoryForgeResult<Option<bool>> {
    conn.query_row(
        "SELECT is_archived FROM memories WHERE id = ?1",
        params![id],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map_err(map_err)
    .map(|v| v.map(|v| v != 0))
}
