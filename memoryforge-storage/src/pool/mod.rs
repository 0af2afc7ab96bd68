//! Connection pool: one serialized writer, a round-robin pool of readers.

mod pragmas;
mod read_pool;
mod write_connection;

use std::path::{Path, PathBuf};

use memoryforge_core::errors::MemoryForgeResult;

pub use pragmas::verify_wal_mode;
pub use read_pool::{ReadPool, DEFAULT_POOL_SIZE};
pub use write_connection::WriteConnection;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    pub fn open(path: &Path, read_pool_size: usize) -> MemoryForgeResult<Self> {
        let writer = WriteConnection::open(path)?;
        let readers = ReadPool::open(path, read_pool_size)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory pool for tests. Readers and writer see separate databases,
    /// so reader-visibility tests need a temp-file-backed pool instead.
    pub fn open_in_memory(read_pool_size: usize) -> MemoryForgeResult<Self> {
        let writer = WriteConnection::open_in_memory()?;
        let readers = ReadPool::open_in_memory(read_pool_size)?;
        Ok(Self {
            writer,
            readers,
            db_path: None,
        })
    }
}
