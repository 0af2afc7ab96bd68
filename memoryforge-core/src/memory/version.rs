use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A snapshot of a memory's content taken when the consolidator archives it.
/// `version` is monotonic per `memory_id`, starting at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryVersion {
    pub id: String,
    pub memory_id: String,
    pub content: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
}
