//! Best-effort commit links (memory_links) and embedding references.

use rusqlite::{params, Connection, OptionalExtension};

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::{LinkType, MemoryLink};

use crate::map_err;

fn link_type_to_str(t: LinkType) -> &'static str {
    match t {
        LinkType::CreatedFrom => "created_from",
        LinkType::MentionedIn => "mentioned_in",
        LinkType::RelatedTo => "related_to",
    }
}

fn link_type_from_str(s: &str) -> LinkType {
    match s {
        "created_from" => LinkType::CreatedFrom,
        "mentioned_in" => LinkType::MentionedIn,
        _ => LinkType::RelatedTo,
    }
}

pub fn create_memory_link(conn: &Connection, link: &MemoryLink) -> MemoryForgeResult<()> {
    conn.execute(
        "INSERT INTO memory_links (id, memory_id, commit_sha, link_type, created_at)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            link.id,
            link.memory_id,
            link.commit_sha,
            link_type_to_str(link.link_type),
            link.created_at.to_rfc3339(),
        ],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn get_memory_links(conn: &Connection, memory_id: &str) -> MemoryForgeResult<Vec<MemoryLink>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, memory_id, commit_sha, link_type, created_at FROM memory_links
             WHERE memory_id = ?1 ORDER BY created_at DESC",
        )
        .map_err(map_err)?;
    let rows = stmt
        .query_map(params![memory_id], |row| {
            let link_type: String = row.get(3)?;
            let created_at: String = row.get(4)?;
            Ok(MemoryLink {
                id: row.get(0)?,
                memory_id: row.get(1)?,
                commit_sha: row.get(2)?,
                link_type: link_type_from_str(&link_type),
                created_at: created_at.parse().unwrap_or_else(|_| chrono::Utc::now()),
            })
        })
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

pub fn save_embedding_reference(conn: &Connection, memory_id: &str, vector_id: &str) -> MemoryForgeResult<()> {
    conn.execute(
        "INSERT INTO embedding_references (memory_id, vector_id) VALUES (?1, ?2)
         ON CONFLICT(memory_id) DO UPDATE SET vector_id = excluded.vector_id",
        params![memory_id, vector_id],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn get_embedding_reference(conn: &Connection, memory_id: &str) -> MemoryForgeResult<Option<String>> {
    conn.query_row(
        "SELECT vector_id FROM embedding_references WHERE memory_id = ?1",
        params![memory_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(map_err)
}

pub fn delete_embedding_reference(conn: &Connection, memory_id: &str) -> MemoryForgeResult<()> {
    conn.execute(
        "DELETE FROM embedding_references WHERE memory_id = ?1",
        params![memory_id],
    )
    .map_err(map_err)?;
    Ok(())
}
