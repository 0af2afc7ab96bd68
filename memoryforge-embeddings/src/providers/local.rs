//! On-device embedding provider.
//!
//! A real build of this component would load a small sentence-embedding
//! model (e.g. via `ort`/ONNX Runtime) and run inference locally. That model
//! integration is out of scope here; this stub keeps the 384-dimensional
//! contract the rest of the system expects and backs it with the same
//! deterministic hashing scheme used for degradation, so callers who select
//! the local provider still get stable, comparable vectors.

use memoryforge_core::constants::LOCAL_EMBEDDING_DIMENSION;
use memoryforge_core::errors::MemoryForgeResult;
use memoryforge_core::traits::EmbeddingProvider;

use crate::providers::hashing::HashingProvider;

pub struct LocalProvider {
    inner: HashingProvider,
}

impl LocalProvider {
    pub fn new() -> Self {
        Self {
            inner: HashingProvider::new(LOCAL_EMBEDDING_DIMENSION),
        }
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingProvider for LocalProvider {
    fn generate(&self, text: &str) -> MemoryForgeResult<Vec<f32>> {
        self.inner.generate(text)
    }

    fn dimension(&self) -> usize {
        LOCAL_EMBEDDING_DIMENSION
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_the_local_dimension() {
        let provider = LocalProvider::new();
        assert_eq!(provider.dimension(), 384);
        assert_eq!(provider.generate("hello world").unwrap().len(), 384);
    }

    #[test]
    fn name_is_local() {
        assert_eq!(LocalProvider::new().name(), "local");
    }
}
