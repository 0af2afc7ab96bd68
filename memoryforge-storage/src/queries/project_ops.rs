//! Project CRUD.

use rusqlite::{params, Connection, OptionalExtension};

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::Project;

use crate::map_err;

fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    let created_at: String = row.get("created_at")?;
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        root_path: row.get("root_path")?,
        created_at: created_at.parse().unwrap_or_else(|_| chrono::Utc::now()),
    })
}

pub fn create_project(conn: &Connection, project: &Project) -> MemoryForgeResult<()> {
    let exists = get_project_by_name(conn, &project.name)?.is_some();
    if exists {
        return Err(MemoryForgeError::Conflict(format!(
            "a project named '{}' already exists",
            project.name
        )));
    }
    conn.execute(
        "INSERT INTO projects (id, name, root_path, created_at) VALUES (?1,?2,?3,?4)",
        params![
            project.id,
            project.name,
            project.root_path,
            project.created_at.to_rfc3339(),
        ],
    )
    .map_err(map_err)?;
    Ok(())
}

pub fn get_project(conn: &Connection, id: &str) -> MemoryForgeResult<Option<Project>> {
    conn.query_row("SELECT * FROM projects WHERE id = ?1", params![id], row_to_project)
        .optional()
        .map_err(map_err)
}

pub fn get_project_by_name(conn: &Connection, name: &str) -> MemoryForgeResult<Option<Project>> {
    conn.query_row(
        "SELECT * FROM projects WHERE name = ?1",
        params![name],
        row_to_project,
    )
    .optional()
    .map_err(map_err)
}

pub fn list_projects(conn: &Connection) -> MemoryForgeResult<Vec<Project>> {
    let mut stmt = conn
        .prepare("SELECT * FROM projects ORDER BY created_at ASC")
        .map_err(map_err)?;
    let rows = stmt.query_map([], row_to_project).map_err(map_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

/// Fails with `Conflict` if the project owns any memory, archived or not.
pub fn delete_project(conn: &Connection, id: &str) -> MemoryForgeResult<()> {
    let memory_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM memories WHERE project_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(map_err)?;
    if memory_count > 0 {
        return Err(MemoryForgeError::Conflict(format!(
            "project {id} still owns {memory_count} memories"
        )));
    }
    conn.execute("DELETE FROM projects WHERE id = ?1", params![id])
        .map_err(map_err)?;
    Ok(())
}
