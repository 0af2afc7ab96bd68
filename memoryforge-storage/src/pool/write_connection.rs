//! Single write connection behind a plain mutex. Writes are serialized, one
//! transaction per logical operation, never concurrent with one another.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};

use super::pragmas::apply_pragmas;
use crate::map_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> MemoryForgeResult<Self> {
        let conn = Connection::open(path).map_err(map_err)?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> MemoryForgeResult<Self> {
        let conn = Connection::open_in_memory().map_err(map_err)?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and run `f` with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> MemoryForgeResult<T>
    where
        F: FnOnce(&Connection) -> MemoryForgeResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| MemoryForgeError::fatal("sqlite", format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
