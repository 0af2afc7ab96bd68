//! Fallback chain for embedding generation.
//!
//! Tries the configured provider first, then each fallback in order, ending
//! with the always-succeeding hashing provider. Unlike a health-polled chain,
//! providers here have no liveness flag to check in advance — failure is
//! discovered by calling `generate` and catching the error.

use chrono::{DateTime, Utc};
use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::traits::EmbeddingProvider;
use tracing::warn;

use crate::providers::HashingProvider;

/// One degraded-mode fallback: which provider failed, what was tried instead.
#[derive(Debug, Clone)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

/// Orders a primary provider ahead of a last-resort hashing fallback so a
/// caller always gets a vector back, even with no reachable backend.
pub struct DegradationChain {
    chain: Vec<Box<dyn EmbeddingProvider>>,
    events: Vec<DegradationEvent>,
}

impl DegradationChain {
    /// Build a chain around `primary`, with the hashing provider (at
    /// `primary`'s dimension) appended as the guaranteed fallback.
    pub fn new(primary: Box<dyn EmbeddingProvider>) -> Self {
        let fallback_dim = primary.dimension();
        Self {
            chain: vec![primary, Box::new(HashingProvider::new(fallback_dim))],
            events: Vec::new(),
        }
    }

    /// Append another provider ahead of the hashing fallback.
    pub fn push(&mut self, provider: Box<dyn EmbeddingProvider>) {
        let last = self.chain.len() - 1;
        self.chain.insert(last, provider);
    }

    /// Embed `text`, returning the vector and the name of the provider that
    /// produced it. Logs a [`DegradationEvent`] for every fallback taken.
    pub fn embed(&mut self, text: &str) -> MemoryForgeResult<(Vec<f32>, String)> {
        let primary_name = self.chain[0].name().to_string();
        let mut last_err = None;

        for (i, provider) in self.chain.iter().enumerate() {
            match provider.generate(text) {
                Ok(vector) => {
                    if i > 0 {
                        self.events.push(DegradationEvent {
                            component: "embeddings".to_string(),
                            failure: format!("{primary_name} unavailable"),
                            fallback_used: provider.name().to_string(),
                            timestamp: Utc::now(),
                        });
                    }
                    return Ok((vector, provider.name().to_string()));
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, trying next in chain");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            MemoryForgeError::transient("embeddings", "all providers exhausted")
        }))
    }

    /// Embed a batch of texts, one provider attempt at a time across the
    /// whole batch (no per-text provider mixing).
    pub fn embed_batch(&mut self, texts: &[String]) -> MemoryForgeResult<(Vec<Vec<f32>>, String)> {
        let primary_name = self.chain[0].name().to_string();
        let mut last_err = None;

        for (i, provider) in self.chain.iter().enumerate() {
            match provider.generate_batch(texts) {
                Ok(vectors) => {
                    if i > 0 {
                        self.events.push(DegradationEvent {
                            component: "embeddings".to_string(),
                            failure: format!("{primary_name} unavailable"),
                            fallback_used: provider.name().to_string(),
                            timestamp: Utc::now(),
                        });
                    }
                    return Ok((vectors, provider.name().to_string()));
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "batch embed failed, trying next in chain");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            MemoryForgeError::transient("embeddings", "all providers exhausted")
        }))
    }

    /// Name of the provider the chain would try first.
    pub fn active_provider_name(&self) -> &str {
        self.chain[0].name()
    }

    /// Drain accumulated degradation events.
    pub fn drain_events(&mut self) -> Vec<DegradationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}
