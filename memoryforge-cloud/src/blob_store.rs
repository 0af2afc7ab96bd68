//! Reference `BlobStore`: a plain directory on disk, suitable for a shared
//! drive or a git-tracked folder. Files are `*.json` sync envelopes.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::traits::BlobStore;

pub struct LocalFileBlobStore {
    root: PathBuf,
}

impl LocalFileBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn io_error(context: &str, err: std::io::Error) -> MemoryForgeError {
        MemoryForgeError::transient("local_file_blob_store", format!("{context}: {err}"))
    }
}

impl BlobStore for LocalFileBlobStore {
    fn initialize(&self) -> MemoryForgeResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| Self::io_error("creating sync directory", e))
    }

    fn list_files(&self) -> MemoryForgeResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| Self::io_error("listing sync directory", e))? {
            let entry = entry.map_err(|e| Self::io_error("reading directory entry", e))?;
            if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    fn read_file(&self, name: &str) -> MemoryForgeResult<Vec<u8>> {
        fs::read(self.path_for(name)).map_err(|e| Self::io_error(&format!("reading {name}"), e))
    }

    fn write_file(&self, name: &str, contents: &[u8]) -> MemoryForgeResult<()> {
        self.initialize()?;
        fs::write(self.path_for(name), contents).map_err(|e| Self::io_error(&format!("writing {name}"), e))
    }

    fn delete_file(&self, name: &str) -> MemoryForgeResult<()> {
        let path = self.path_for(name);
        if path.exists() {
            fs::remove_file(path).map_err(|e| Self::io_error(&format!("deleting {name}"), e))?;
        }
        Ok(())
    }

    fn get_last_modified(&self, name: &str) -> MemoryForgeResult<Option<DateTime<Utc>>> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| Self::io_error(&format!("reading metadata for {name}"), e))?;
        Ok(Some(DateTime::<Utc>::from(modified)))
    }
}
