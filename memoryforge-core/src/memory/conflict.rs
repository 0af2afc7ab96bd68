use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a sync conflict on a memory was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    LocalWins,
    RemoteWins,
    Manual,
    Merged,
}

/// A record of a single conflict encountered (and resolved) during sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictLogEntry {
    pub id: String,
    pub memory_id: String,
    pub local_content: Option<String>,
    pub remote_content: Option<String>,
    pub resolution: Resolution,
    pub resolved_at: DateTime<Utc>,
    pub resolved_by: Option<String>,
}
