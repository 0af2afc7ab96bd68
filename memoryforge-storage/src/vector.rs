//! A brute-force cosine-similarity vector index backed by its own SQLite
//! file per project, stored under the engine's `qdrant/` directory (the name
//! is inherited from the reference implementation; the format here is opaque
//! and private to this crate — nothing else reads that file).
//!
//! Real ANN libraries need a loadable extension or a separate server; this
//! index instead stores `(memory_id, vector, payload)` rows and scans them
//! in Rust, the same approach the teacher storage engine falls back to.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::memory::MemoryType;
use memoryforge_core::traits::{VectorHit, VectorIndex, VectorPayload};

use crate::map_err;

/// Derive a project's collection/file name from the first 8 chars of its id.
pub fn collection_name(project_id: &str) -> String {
    project_id.chars().take(8).collect()
}

pub struct SqliteVectorIndex {
    conn: Mutex<Connection>,
}

impl SqliteVectorIndex {
    /// Open (creating if absent) the vector file for `project_id` under `root`.
    pub fn open(root: &Path, project_id: &str) -> MemoryForgeResult<Self> {
        std::fs::create_dir_all(root)?;
        let path = Self::collection_path(root, project_id);
        let conn = Connection::open(path).map_err(map_err)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> MemoryForgeResult<Self> {
        let conn = Connection::open_in_memory().map_err(map_err)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn collection_path(root: &Path, project_id: &str) -> PathBuf {
        root.join(format!("{}.sqlite", collection_name(project_id)))
    }

    fn init_schema(conn: &Connection) -> MemoryForgeResult<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS vectors (
                memory_id   TEXT PRIMARY KEY,
                project_id  TEXT NOT NULL,
                memory_type TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                dimension   INTEGER NOT NULL,
                vector      BLOB NOT NULL
            );
            ",
        )
        .map_err(map_err)
    }

    /// Drop and recreate the vectors table on a provider dimension mismatch (§4.2).
    fn recreate(conn: &Connection) -> MemoryForgeResult<()> {
        conn.execute_batch("DROP TABLE IF EXISTS vectors;").map_err(map_err)?;
        Self::init_schema(conn)
    }
}

fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Cosine similarity in `[-1, 1]`. Zero-norm operands yield 0.0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorIndex for SqliteVectorIndex {
    fn upsert(&self, memory_id: &str, vector: &[f32], payload: VectorPayload) -> MemoryForgeResult<()> {
        let conn = self.conn.lock().unwrap();
        let existing_dim = Self::dimension_locked(&conn)?;
        if let Some(existing_dim) = existing_dim {
            if existing_dim != vector.len() {
                Self::recreate(&conn)?;
            }
        }
        conn.execute(
            "INSERT INTO vectors (memory_id, project_id, memory_type, created_at, dimension, vector)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(memory_id) DO UPDATE SET
                project_id = excluded.project_id,
                memory_type = excluded.memory_type,
                created_at = excluded.created_at,
                dimension = excluded.dimension,
                vector = excluded.vector",
            params![
                memory_id,
                payload.project_id,
                payload.memory_type.as_str(),
                payload.created_at.to_rfc3339(),
                vector.len() as i64,
                f32_vec_to_bytes(vector),
            ],
        )
        .map_err(map_err)?;
        Ok(())
    }

    fn delete(&self, memory_id: &str) -> MemoryForgeResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM vectors WHERE memory_id = ?1", params![memory_id])
            .map_err(map_err)?;
        Ok(())
    }

    fn search(
        &self,
        query: &[f32],
        k: usize,
        type_filter: Option<MemoryType>,
        min_score: f32,
    ) -> MemoryForgeResult<Vec<VectorHit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT memory_id, project_id, memory_type, created_at, vector FROM vectors")
            .map_err(map_err)?;
        let rows = stmt
            .query_map([], |row| {
                let memory_id: String = row.get(0)?;
                let project_id: String = row.get(1)?;
                let memory_type: String = row.get(2)?;
                let created_at: String = row.get(3)?;
                let vector: Vec<u8> = row.get(4)?;
                Ok((memory_id, project_id, memory_type, created_at, vector))
            })
            .map_err(map_err)?;

        let mut scored: Vec<VectorHit> = Vec::new();
        for row in rows {
            let (memory_id, project_id, memory_type_raw, created_at_raw, blob) =
                row.map_err(map_err)?;
            let memory_type = parse_memory_type(&memory_type_raw);
            if let Some(filter) = type_filter {
                if memory_type != filter {
                    continue;
                }
            }
            let stored = bytes_to_f32_vec(&blob);
            if stored.len() != query.len() {
                continue;
            }
            let score = cosine_similarity(query, &stored);
            if score < min_score {
                continue;
            }
            let created_at: DateTime<Utc> = created_at_raw
                .parse()
                .unwrap_or_else(|_| Utc::now());
            scored.push((
                memory_id,
                score,
                VectorPayload {
                    memory_type,
                    created_at,
                    project_id,
                },
            ));
        }
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    fn count(&self) -> MemoryForgeResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM vectors", [], |row| row.get(0))
            .map_err(map_err)?;
        Ok(count as usize)
    }

    fn rebuild(&self) -> MemoryForgeResult<()> {
        let conn = self.conn.lock().unwrap();
        Self::recreate(&conn)
    }

    fn dimension(&self) -> MemoryForgeResult<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        Self::dimension_locked(&conn)
    }
}

impl SqliteVectorIndex {
    fn dimension_locked(conn: &Connection) -> MemoryForgeResult<Option<usize>> {
        let dim: Option<i64> = conn
            .query_row("SELECT dimension FROM vectors LIMIT 1", [], |row| row.get(0))
            .ok();
        Ok(dim.map(|d| d as usize))
    }
}

fn parse_memory_type(raw: &str) -> MemoryType {
    match raw {
        "stack" => MemoryType::Stack,
        "decision" => MemoryType::Decision,
        "constraint" => MemoryType::Constraint,
        "convention" => MemoryType::Convention,
        _ => MemoryType::Note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoryforge_core::memory::MemoryType;

    fn payload(project_id: &str, memory_type: MemoryType) -> VectorPayload {
        VectorPayload {
            memory_type,
            created_at: Utc::now(),
            project_id: project_id.to_string(),
        }
    }

    #[test]
    fn upsert_and_search_round_trips() {
        let index = SqliteVectorIndex::open_in_memory().unwrap();
        index
            .upsert("mem-1", &[1.0, 0.0, 0.0], payload("proj-1", MemoryType::Stack))
            .unwrap();
        index
            .upsert("mem-2", &[0.0, 1.0, 0.0], payload("proj-1", MemoryType::Note))
            .unwrap();

        let hits = index.search(&[1.0, 0.0, 0.0], 5, None, 0.0).unwrap();
        assert_eq!(hits[0].0, "mem-1");
        assert!(hits[0].1 > 0.99);
    }

    #[test]
    fn type_filter_excludes_other_types() {
        let index = SqliteVectorIndex::open_in_memory().unwrap();
        index
            .upsert("mem-1", &[1.0, 0.0], payload("proj-1", MemoryType::Stack))
            .unwrap();
        index
            .upsert("mem-2", &[1.0, 0.0], payload("proj-1", MemoryType::Note))
            .unwrap();

        let hits = index
            .search(&[1.0, 0.0], 5, Some(MemoryType::Stack), 0.0)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "mem-1");
    }

    #[test]
    fn delete_removes_from_search() {
        let index = SqliteVectorIndex::open_in_memory().unwrap();
        index
            .upsert("mem-1", &[1.0, 0.0], payload("proj-1", MemoryType::Stack))
            .unwrap();
        index.delete("mem-1").unwrap();
        assert_eq!(index.count().unwrap(), 0);
    }

    #[test]
    fn dimension_mismatch_recreates_the_index() {
        let index = SqliteVectorIndex::open_in_memory().unwrap();
        index
            .upsert("mem-1", &[1.0, 0.0], payload("proj-1", MemoryType::Stack))
            .unwrap();
        index
            .upsert("mem-2", &[1.0, 0.0, 0.0], payload("proj-1", MemoryType::Stack))
            .unwrap();
        assert_eq!(index.count().unwrap(), 1);
        assert_eq!(index.dimension().unwrap(), Some(3));
    }
}
