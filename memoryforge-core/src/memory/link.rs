use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a commit relates to the memory it's linked to. Best-effort and
/// non-authoritative: produced by a read-only scan of the project's git log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    CreatedFrom,
    MentionedIn,
    RelatedTo,
}

/// A best-effort link between a memory and a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLink {
    pub id: String,
    pub memory_id: String,
    /// Opaque hex commit sha, not validated against any particular VCS.
    pub commit_sha: String,
    pub link_type: LinkType,
    pub created_at: DateTime<Utc>,
}
