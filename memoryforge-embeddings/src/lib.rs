//! Embedding provider implementations and the fallback chain that wraps them.
//!
//! Provider selection is a pure function of configuration: given an
//! [`EmbeddingProviderKind`] the caller gets back a boxed [`EmbeddingProvider`],
//! with no hidden state or caching layer in between.

pub mod degradation;
pub mod providers;
pub mod retry;

use memoryforge_core::config::{EmbeddingProviderKind, MemoryForgeConfig};
use memoryforge_core::traits::EmbeddingProvider;

pub use degradation::{DegradationChain, DegradationEvent};
pub use providers::{HashingProvider, LocalProvider, RemoteProvider};

/// Build the provider selected by `config.embedding_provider`.
pub fn create_provider(config: &MemoryForgeConfig) -> Box<dyn EmbeddingProvider> {
    match config.embedding_provider {
        EmbeddingProviderKind::Remote => Box::new(RemoteProvider::new(
            config.remote_api_key.clone(),
            config.remote_embedding_model.clone(),
        )),
        EmbeddingProviderKind::Local => Box::new(LocalProvider::new()),
    }
}

/// Build the selected provider wrapped in a [`DegradationChain`] that falls
/// back to the deterministic hashing provider on failure.
pub fn create_chain(config: &MemoryForgeConfig) -> DegradationChain {
    DegradationChain::new(create_provider(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_kind_produces_a_local_provider() {
        let mut config = MemoryForgeConfig::default();
        config.embedding_provider = EmbeddingProviderKind::Local;
        let provider = create_provider(&config);
        assert_eq!(provider.name(), "local");
        assert_eq!(provider.dimension(), 384);
    }

    #[test]
    fn remote_kind_produces_a_remote_provider() {
        let mut config = MemoryForgeConfig::default();
        config.embedding_provider = EmbeddingProviderKind::Remote;
        config.remote_api_key = "test-key".to_string();
        let provider = create_provider(&config);
        assert_eq!(provider.name(), "remote");
        assert_eq!(provider.dimension(), 1536);
    }

    #[test]
    fn chain_always_produces_a_vector() {
        let mut config = MemoryForgeConfig::default();
        config.embedding_provider = EmbeddingProviderKind::Local;
        let mut chain = create_chain(&config);
        let (vector, _) = chain.embed("hello world").unwrap();
        assert_eq!(vector.len(), 384);
    }
}
