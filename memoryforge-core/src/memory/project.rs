use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project is the top-level namespace everything else hangs off of.
/// Destroyed only when it owns zero memories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    /// Unique, 1..=255 chars.
    pub name: String,
    pub root_path: String,
    pub created_at: DateTime<Utc>,
}
