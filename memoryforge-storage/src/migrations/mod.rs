//! Declarative, numbered schema migrations, run once at startup.

mod backup;
mod v1_to_v2;
mod v2_to_v3;

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::Connection;

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};

use crate::map_err;
use crate::schema::{create_v1_schema, LATEST_SCHEMA_VERSION};

pub use backup::list_backups;

const CRITICAL_TABLES: [&str; 2] = ["memories", "projects"];

/// Current schema version, or 1 if the `schema_version` table doesn't exist yet.
pub fn get_schema_version(conn: &Connection) -> MemoryForgeResult<u32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |_| Ok(true),
        )
        .unwrap_or(false);
    if !table_exists {
        return Ok(1);
    }
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
        .map_err(map_err)?;
    Ok(version.unwrap_or(1))
}

pub fn set_schema_version(
    conn: &Connection,
    version: u32,
    description: Option<&str>,
) -> MemoryForgeResult<()> {
    conn.execute(
        "INSERT INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, Utc::now().to_rfc3339(), description],
    )
    .map_err(map_err)?;
    Ok(())
}

fn row_counts(conn: &Connection) -> MemoryForgeResult<HashMap<&'static str, u64>> {
    let mut counts = HashMap::new();
    for table in CRITICAL_TABLES {
        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if !exists {
            continue;
        }
        let count: u64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .map_err(map_err)?;
        counts.insert(table, count);
    }
    Ok(counts)
}

fn apply_step(conn: &Connection, from_version: u32) -> MemoryForgeResult<()> {
    match from_version {
        1 => v1_to_v2::migrate(conn),
        2 => v2_to_v3::migrate(conn),
        other => Err(MemoryForgeError::Migration(format!(
            "no migration step known for version {other}"
        ))),
    }
}

/// Build a brand-new database at [`LATEST_SCHEMA_VERSION`] on an already-open
/// connection. Shared by fresh-file initialization and in-memory test setup.
pub fn init_fresh_schema(conn: &Connection) -> MemoryForgeResult<()> {
    create_v1_schema(conn)?;
    let mut version = 1;
    while version < LATEST_SCHEMA_VERSION {
        apply_step(conn, version)?;
        set_schema_version(conn, version + 1, Some("initial creation"))?;
        version += 1;
    }
    Ok(())
}

/// Run migrations against the database file at `db_path` up to `target`
/// (defaulting to [`LATEST_SCHEMA_VERSION`]).
///
/// If `verify` is set, row counts of `memories` and `projects` are snapshotted
/// before migrating and checked for shrinkage afterward; any failure restores
/// the pre-migration backup before returning the error.
pub fn run_migration(db_path: &Path, verify: bool, target: Option<u32>) -> MemoryForgeResult<()> {
    let target = target.unwrap_or(LATEST_SCHEMA_VERSION);
    memoryforge_observability::run_migration_span!(target).in_scope(|| run_migration_inner(db_path, verify, target))
}

fn run_migration_inner(db_path: &Path, verify: bool, target: u32) -> MemoryForgeResult<()> {
    if !db_path.exists() {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path).map_err(map_err)?;
        if target >= LATEST_SCHEMA_VERSION {
            return init_fresh_schema(&conn);
        }
        create_v1_schema(&conn)?;
        let mut current = 1;
        while current < target {
            apply_step(&conn, current)?;
            set_schema_version(&conn, current + 1, Some("initial creation"))?;
            current += 1;
        }
        return Ok(());
    }

    let conn = Connection::open(db_path).map_err(map_err)?;
    let current = get_schema_version(&conn)?;
    if current >= target {
        return Ok(());
    }

    let before = if verify { row_counts(&conn)? } else { HashMap::new() };

    drop(conn);
    let backup_path = backup::create_backup(db_path)?;

    let result = (|| -> MemoryForgeResult<()> {
        let conn = Connection::open(db_path).map_err(map_err)?;
        let mut version = current;
        while version < target {
            apply_step(&conn, version)?;
            set_schema_version(&conn, version + 1, None)?;
            version += 1;
        }
        if verify {
            let after = row_counts(&conn)?;
            for (table, before_count) in &before {
                let after_count = after.get(table).copied().unwrap_or(0);
                if after_count < *before_count {
                    return Err(MemoryForgeError::Migration(format!(
                        "table {table} lost rows during migration: {before_count} -> {after_count}"
                    )));
                }
            }
        }
        Ok(())
    })();

    if let Err(err) = result {
        backup::restore_backup(db_path, &backup_path)?;
        return Err(err);
    }

    backup::rotate_backups(db_path)?;
    Ok(())
}

/// If any memory was created after the most recent backup's mtime, returns a
/// warning mentioning how many would be lost by a restore.
pub fn get_rollback_warning(db_path: &Path, conn: &Connection) -> MemoryForgeResult<Option<String>> {
    let backups = backup::list_backups(db_path)?;
    let Some(latest) = backups.last() else {
        return Ok(None);
    };
    let mtime = std::fs::metadata(latest)?.modified()?;
    let mtime: chrono::DateTime<Utc> = mtime.into();

    let count: u64 = conn
        .query_row(
            "SELECT COUNT(*) FROM memories WHERE created_at > ?1",
            [mtime.to_rfc3339()],
            |row| row.get(0),
        )
        .map_err(map_err)?;
    if count == 0 {
        return Ok(None);
    }
    Ok(Some(format!(
        "{count} memories were created after the latest backup and would be lost by a restore"
    )))
}
