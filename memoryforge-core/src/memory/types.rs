use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a memory, as asserted by its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// A fact about the technology stack in use.
    Stack,
    /// A decision made and its rationale.
    Decision,
    /// A hard constraint the project must respect.
    Constraint,
    /// A team or project convention.
    Convention,
    /// A free-form note that doesn't fit the other categories.
    Note,
}

impl MemoryType {
    pub const ALL: [MemoryType; 5] = [
        Self::Stack,
        Self::Decision,
        Self::Constraint,
        Self::Convention,
        Self::Note,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stack => "stack",
            Self::Decision => "decision",
            Self::Constraint => "constraint",
            Self::Convention => "convention",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a memory originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    /// Captured from a chat turn with the assistant.
    Chat,
    /// Entered directly by a human through a manual API call.
    Manual,
    /// Extracted because a file was referenced during a session.
    FileReference,
    /// Linked from a commit by the best-effort git scan.
    Git,
}

impl MemorySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Manual => "manual",
            Self::FileReference => "file_reference",
            Self::Git => "git",
        }
    }
}

impl fmt::Display for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_serde() {
        let t = MemoryType::Decision;
        let s = serde_json::to_string(&t).unwrap();
        assert_eq!(s, "\"decision\"");
        let back: MemoryType = serde_json::from_str(&s).unwrap();
        assert_eq!(back, t);
    }
}
