use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row recording that the schema was migrated to `version`.
/// `max(version)` across all rows is the database's current schema level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaVersionRecord {
    pub version: u32,
    pub applied_at: DateTime<Utc>,
    pub description: Option<String>,
}
