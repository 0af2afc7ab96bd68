//! The JSON shape written to and read from a `BlobStore`, one file per
//! memory, named `{memory_id}.json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::Memory;

use crate::crypto::{checksum, SyncKey};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub id: String,
    pub project_id: String,
    pub updated_at: DateTime<Utc>,
    pub checksum: String,
    pub encrypted_data: String,
}

impl Envelope {
    pub fn file_name(memory_id: &str) -> String {
        format!("{memory_id}.json")
    }

    /// Serialize, checksum, and encrypt `memory` into a ready-to-write envelope.
    pub fn seal(memory: &Memory, key: &SyncKey) -> MemoryForgeResult<Self> {
        let plaintext = serde_json::to_string(memory)?;
        Ok(Self {
            id: memory.id.clone(),
            project_id: memory.project_id.clone(),
            updated_at: memory.updated_at.unwrap_or(memory.created_at),
            checksum: checksum(&plaintext),
            encrypted_data: key.encrypt(&plaintext)?,
        })
    }

    /// Decrypt and verify integrity, returning the enclosed memory record.
    pub fn open(&self, key: &SyncKey) -> MemoryForgeResult<Memory> {
        let plaintext = key.decrypt(&self.encrypted_data)?;
        if checksum(&plaintext) != self.checksum {
            return Err(MemoryForgeError::Integrity(format!(
                "checksum mismatch for memory {}",
                self.id
            )));
        }
        Ok(serde_json::from_str(&plaintext)?)
    }

    pub fn to_bytes(&self) -> MemoryForgeResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> MemoryForgeResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
