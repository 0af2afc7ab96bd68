use thiserror::Error;

/// The full error taxonomy surfaced by every component in the engine.
///
/// M, Ret, Con, Sync, and Mig never translate one kind into another — they
/// propagate the underlying kind unchanged. The one exception is search:
/// a `TransientBackendError` from V or E during retrieval degrades into the
/// keyword fallback rather than failing the call.
#[derive(Debug, Error)]
pub enum MemoryForgeError {
    #[error("validation error on field `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not initialized: {0}")]
    NotInitialized(String),

    #[error("integrity error: {0}")]
    Integrity(String),

    #[error("transient backend error in {backend}: {message}")]
    TransientBackend { backend: String, message: String },

    #[error("fatal backend error in {backend}: {message}")]
    FatalBackend { backend: String, message: String },

    #[error("migration error: {0}")]
    Migration(String),
}

impl MemoryForgeError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn transient(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransientBackend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn fatal(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FatalBackend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Whether this error is eligible for the keyword-search degradation path (§4.6).
    pub fn is_retrieval_degradable(&self) -> bool {
        matches!(self, Self::TransientBackend { .. })
    }
}

impl From<serde_json::Error> for MemoryForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation {
            field: "metadata".into(),
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for MemoryForgeError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Validation {
            field: "config".into(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for MemoryForgeError {
    fn from(err: std::io::Error) -> Self {
        Self::FatalBackend {
            backend: "filesystem".into(),
            message: err.to_string(),
        }
    }
}

pub type MemoryForgeResult<T> = Result<T, MemoryForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_backend_is_retrieval_degradable() {
        let err = MemoryForgeError::transient("vector_index", "timed out");
        assert!(err.is_retrieval_degradable());
        let err = MemoryForgeError::fatal("vector_index", "corrupt");
        assert!(!err.is_retrieval_degradable());
    }
}
