//! The memory relationship graph: directed edges, no self-loops.

use rusqlite::{params, Connection};

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::{MemoryRelation, RelationOrigin, RelationType};
use memoryforge_core::traits::RelationDirection;

use crate::map_err;

fn relation_type_to_str(t: RelationType) -> &'static str {
    match t {
        RelationType::CausedBy => "caused_by",
        RelationType::Supersedes => "supersedes",
        RelationType::RelatesTo => "relates_to",
        RelationType::Blocks => "blocks",
        RelationType::DependsOn => "depends_on",
    }
}

fn relation_type_from_str(s: &str) -> RelationType {
    match s {
        "caused_by" => RelationType::CausedBy,
        "supersedes" => RelationType::Supersedes,
        "blocks" => RelationType::Blocks,
        "depends_on" => RelationType::DependsOn,
        _ => RelationType::RelatesTo,
    }
}

fn origin_to_str(o: RelationOrigin) -> &'static str {
    match o {
        RelationOrigin::Human => "human",
        RelationOrigin::GitDerived => "git-derived",
    }
}

fn origin_from_str(s: &str) -> RelationOrigin {
    match s {
        "git-derived" => RelationOrigin::GitDerived,
        _ => RelationOrigin::Human,
    }
}

fn row_to_relation(row: &rusqlite::Row) -> rusqlite::Result<MemoryRelation> {
    let relation_type: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let created_by: String = row.get(5)?;
    Ok(MemoryRelation {
        id: row.get(0)?,
        source_memory_id: row.get(1)?,
        target_memory_id: row.get(2)?,
        relation_type: relation_type_from_str(&relation_type),
        created_at: created_at.parse().unwrap_or_else(|_| chrono::Utc::now()),
        created_by: origin_from_str(&created_by),
    })
}

pub fn create_memory_relation(conn: &Connection, relation: &MemoryRelation) -> MemoryForgeResult<()> {
    if relation.source_memory_id == relation.target_memory_id {
        return Err(MemoryForgeError::validation(
            "target_memory_id",
            "a memory cannot relate to itself",
        ));
    }
    conn.execute(
        "INSERT INTO memory_relations
            (id, source_memory_id, target_memory_id, relation_type, created_at, created_by)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            relation.id,
            relation.source_memory_id,
            relation.target_memory_id,
            relation_type_to_str(relation.relation_type),
            relation.created_at.to_rfc3339(),
            origin_to_str(relation.created_by),
        ],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn get_memory_relations(
    conn: &Connection,
    memory_id: &str,
    direction: RelationDirection,
) -> MemoryForgeResult<Vec<MemoryRelation>> {
    let sql = match direction {
        RelationDirection::Outgoing => {
            "SELECT id, source_memory_id, target_memory_id, relation_type, created_at, created_by
             FROM memory_relations WHERE source_memory_id = ?1"
        }
        RelationDirection::Incoming => {
            "SELECT id, source_memory_id, target_memory_id, relation_type, created_at, created_by
             FROM memory_relations WHERE target_memory_id = ?1"
        }
        RelationDirection::Both => {
            "SELECT id, source_memory_id, target_memory_id, relation_type, created_at, created_by
             FROM memory_relations WHERE source_memory_id = ?1 OR target_memory_id = ?1"
        }
    };
    let mut stmt = conn.prepare(sql).map_err(map_err)?;
    let rows = stmt
        .query_map(params![memory_id], row_to_relation)
        .map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

pub fn delete_memory_relation(conn: &Connection, relation_id: &str) -> MemoryForgeResult<()> {
    conn.execute("DELETE FROM memory_relations WHERE id = ?1", params![relation_id])
        .map_err(map_err)?;
    Ok(())
}
