//! HTTP-based embedding provider, speaking the OpenAI-style embeddings API
//! (`POST {endpoint}` with `{"model", "input"}`, response `{"data": [{"embedding"}]}`).
//!
//! A production deployment would point `endpoint` at whichever vendor the
//! caller configured; the wire shape here is kept deliberately generic since
//! the actual vendor integration is out of scope.

use serde::{Deserialize, Serialize};
use tracing::warn;

use memoryforge_core::constants::REMOTE_EMBEDDING_DIMENSION;
use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::traits::EmbeddingProvider;

use crate::retry::with_retry;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

/// Client errors (4xx) are the caller's fault and never retried; only
/// server errors (5xx) are eligible for `with_retry`'s backoff.
fn status_to_error(status: reqwest::StatusCode) -> MemoryForgeError {
    let message = format!("embeddings endpoint returned {status}");
    if status.is_client_error() {
        MemoryForgeError::fatal("remote", message)
    } else {
        MemoryForgeError::transient("remote", message)
    }
}

pub struct RemoteProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl RemoteProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            model,
            dimension: REMOTE_EMBEDDING_DIMENSION,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn call(&self, text: &str) -> MemoryForgeResult<Vec<f32>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .map_err(|e| MemoryForgeError::transient("remote", format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(status_to_error(response.status()));
        }

        let parsed: EmbedResponse = response
            .json()
            .map_err(|e| MemoryForgeError::transient("remote", format!("malformed response: {e}")))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| MemoryForgeError::transient("remote", "empty embeddings response"))
    }
}

impl EmbeddingProvider for RemoteProvider {
    fn generate(&self, text: &str) -> MemoryForgeResult<Vec<f32>> {
        with_retry(|attempt| {
            if attempt > 0 {
                warn!(attempt, provider = "remote", "retrying embedding request");
            }
            self.call(text)
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "remote"
    }
}
