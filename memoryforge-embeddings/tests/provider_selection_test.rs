use memoryforge_core::config::{EmbeddingProviderKind, MemoryForgeConfig};
use memoryforge_core::traits::EmbeddingProvider;
use memoryforge_embeddings::{create_chain, create_provider};

#[test]
fn local_provider_embeds_text_deterministically() {
    let mut config = MemoryForgeConfig::default();
    config.embedding_provider = EmbeddingProviderKind::Local;

    let provider = create_provider(&config);
    let a = provider.generate("fix the flaky retry test").unwrap();
    let b = provider.generate("fix the flaky retry test").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 384);
}

#[test]
fn batch_generation_matches_elementwise_generation() {
    let mut config = MemoryForgeConfig::default();
    config.embedding_provider = EmbeddingProviderKind::Local;
    let provider = create_provider(&config);

    let texts = vec!["alpha".to_string(), "beta".to_string()];
    let batch = provider.generate_batch(&texts).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], provider.generate("alpha").unwrap());
    assert_eq!(batch[1], provider.generate("beta").unwrap());
}

#[test]
fn chain_around_the_local_provider_succeeds_without_falling_back() {
    let mut config = MemoryForgeConfig::default();
    config.embedding_provider = EmbeddingProviderKind::Local;

    let mut chain = create_chain(&config);
    let (vector, provider_used) = chain.embed("the chain should prefer the primary").unwrap();
    assert_eq!(provider_used, "local");
    assert_eq!(vector.len(), 384);
    assert!(chain.drain_events().is_empty());
}
