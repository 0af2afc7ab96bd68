use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::confidence::Confidence;
use super::types::{MemorySource, MemoryType};

/// Maximum length, in characters, of a memory's content.
pub const MAX_CONTENT_LEN: usize = 10_240;

/// A single fact the engine has learned about a project.
///
/// This is the unit everything else in the crate operates on: the relational
/// store persists it, the vector index embeds its content, the retrieval
/// engine ranks it, and the consolidator merges and supersedes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// UUID v4 identifier.
    pub id: String,
    /// The project this memory belongs to.
    pub project_id: String,
    /// The memory's text, 1..=10240 chars.
    pub content: String,
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    pub source: MemorySource,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether a human has explicitly confirmed this memory is accurate.
    pub confirmed: bool,
    /// Free-form structured data attached by the caller (e.g. file path, commit sha).
    pub metadata: Value,
    /// Set when the decay scorer or a conflict resolution marks this memory untrustworthy.
    pub is_stale: bool,
    pub stale_reason: Option<String>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub is_archived: bool,
    /// If the consolidator folded this memory into another, the surviving memory's id.
    pub consolidated_into: Option<String>,
    pub confidence_score: Confidence,
    /// blake3 hash of `content`, used for dedup and embedding-cache lookups.
    pub content_hash: String,
}

impl Memory {
    /// Compute the blake3 content hash used for dedup and embedding-cache lookups.
    pub fn compute_content_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Build a brand-new, unconfirmed, non-stale, non-archived memory.
    pub fn new(
        id: String,
        project_id: String,
        content: String,
        memory_type: MemoryType,
        source: MemorySource,
        created_at: DateTime<Utc>,
    ) -> Self {
        let content_hash = Self::compute_content_hash(&content);
        Self {
            id,
            project_id,
            content,
            memory_type,
            source,
            created_at,
            updated_at: None,
            confirmed: false,
            metadata: Value::Null,
            is_stale: false,
            stale_reason: None,
            last_accessed: None,
            is_archived: false,
            consolidated_into: None,
            confidence_score: Confidence::default(),
            content_hash,
        }
    }
}

impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_memory_has_default_confidence_and_is_not_stale() {
        let m = Memory::new(
            "m1".into(),
            "p1".into(),
            "uses postgres".into(),
            MemoryType::Stack,
            MemorySource::Manual,
            Utc::now(),
        );
        assert_eq!(m.confidence_score.value(), Confidence::DEFAULT);
        assert!(!m.is_stale);
        assert!(!m.is_archived);
        assert!(!m.confirmed);
    }

    #[test]
    fn content_hash_is_deterministic() {
        let a = Memory::compute_content_hash("same text");
        let b = Memory::compute_content_hash("same text");
        let c = Memory::compute_content_hash("different text");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
