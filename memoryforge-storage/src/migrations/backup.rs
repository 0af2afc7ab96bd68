//! Pre-migration backups, and rotation down to the 5 most recent.

use std::path::{Path, PathBuf};

use chrono::Utc;

use memoryforge_core::errors::MemoryForgeResult;

const MAX_BACKUPS: usize = 5;

/// Copy the database file at `db_path` to a timestamped sibling,
/// `<stem>_backup_<YYYYMMDD_HHMMSS>.sqlite`.
pub fn create_backup(db_path: &Path) -> MemoryForgeResult<PathBuf> {
    let stem = db_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("memoryforge");
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let backup_path = db_path.with_file_name(format!("{stem}_backup_{timestamp}.sqlite"));
    std::fs::copy(db_path, &backup_path)?;
    Ok(backup_path)
}

/// Overwrite `db_path` with the contents of `backup_path`.
pub fn restore_backup(db_path: &Path, backup_path: &Path) -> MemoryForgeResult<()> {
    std::fs::copy(backup_path, db_path)?;
    Ok(())
}

/// Delete backups beyond the `MAX_BACKUPS` most recent, sibling to `db_path`.
pub fn rotate_backups(db_path: &Path) -> MemoryForgeResult<usize> {
    let stem = db_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("memoryforge")
        .to_string();
    let dir = db_path.parent().unwrap_or_else(|| Path::new("."));
    let prefix = format!("{stem}_backup_");

    let mut backups: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&prefix))
                .unwrap_or(false)
        })
        .collect();
    backups.sort();

    let mut removed = 0;
    while backups.len() > MAX_BACKUPS {
        let oldest = backups.remove(0);
        std::fs::remove_file(oldest)?;
        removed += 1;
    }
    Ok(removed)
}

/// List backups for `db_path`, newest last, for `get_rollback_warning`.
pub fn list_backups(db_path: &Path) -> MemoryForgeResult<Vec<PathBuf>> {
    let stem = db_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("memoryforge")
        .to_string();
    let dir = db_path.parent().unwrap_or_else(|| Path::new("."));
    let prefix = format!("{stem}_backup_");

    let mut backups: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&prefix))
                .unwrap_or(false)
        })
        .collect();
    backups.sort();
    Ok(backups)
}
