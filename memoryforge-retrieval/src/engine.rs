//! Query pipeline: embed → vector search → hydrate → re-rank → touch, with
//! a keyword-scan fallback when the embedding provider or vector index fails.

use chrono::Utc;

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};
use memoryforge_core::memory::Memory;
use memoryforge_core::traits::{EmbeddingProvider, ListMemoriesFilter, MemoryStorage, VectorIndex};

use crate::keyword;
use crate::ranking;
use crate::types::{SearchOptions, SearchResult};

const DEFAULT_MAX_RESULTS: u32 = 5;
const DEFAULT_MIN_SCORE: f64 = 0.5;
const KEYWORD_FALLBACK_CANDIDATE_CAP: u32 = 100;

pub struct RetrievalEngine<'a> {
    storage: &'a dyn MemoryStorage,
    vector: &'a dyn VectorIndex,
    embedder: &'a dyn EmbeddingProvider,
    default_max_results: u32,
    default_min_score: f64,
}

impl<'a> RetrievalEngine<'a> {
    pub fn new(
        storage: &'a dyn MemoryStorage,
        vector: &'a dyn VectorIndex,
        embedder: &'a dyn EmbeddingProvider,
    ) -> Self {
        Self {
            storage,
            vector,
            embedder,
            default_max_results: DEFAULT_MAX_RESULTS,
            default_min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn with_defaults(mut self, max_results: u32, min_score: f64) -> Self {
        self.default_max_results = max_results;
        self.default_min_score = min_score;
        self
    }

    /// Run the search pipeline for `project_id`. Falls back to a keyword
    /// scan if embedding or vector search fails with a transient error.
    pub fn search(
        &self,
        project_id: &str,
        query: &str,
        options: &SearchOptions,
    ) -> MemoryForgeResult<Vec<SearchResult>> {
        memoryforge_observability::search_span!(query, project_id)
            .in_scope(|| self.search_inner(project_id, query, options))
    }

    fn search_inner(
        &self,
        project_id: &str,
        query: &str,
        options: &SearchOptions,
    ) -> MemoryForgeResult<Vec<SearchResult>> {
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        if query.is_empty() {
            return Err(MemoryForgeError::validation("query", "query must not be blank"));
        }

        let k = options.limit.unwrap_or(self.default_max_results).max(1);
        let threshold = options.min_score.unwrap_or(self.default_min_score);

        match self.vector_search(project_id, &query, k, threshold, options) {
            Ok(results) => Ok(results),
            Err(e) if e.is_retrieval_degradable() => {
                tracing::warn!(error = %e, "vector search degraded, falling back to keyword scan");
                self.keyword_search(project_id, &query, k, options)
            }
            Err(e) => Err(e),
        }
    }

    fn vector_search(
        &self,
        project_id: &str,
        query: &str,
        k: u32,
        threshold: f64,
        options: &SearchOptions,
    ) -> MemoryForgeResult<Vec<SearchResult>> {
        let embedding = self.embedder.generate(query)?;
        let hits = self.vector.search(
            &embedding,
            (k as usize) * 2,
            options.memory_type,
            threshold as f32,
        )?;

        let now = Utc::now();
        let mut scored = Vec::with_capacity(hits.len());
        for (memory_id, score, _payload) in hits {
            let Some(memory) = self.storage.get_memory(&memory_id)? else {
                continue;
            };
            if memory.is_archived {
                continue;
            }
            if options.exclude_stale && memory.is_stale {
                continue;
            }
            if options.confirmed_only && !memory.confirmed {
                continue;
            }
            let final_score = ranking::rerank(&memory, score as f64, now);
            scored.push((memory, final_score));
        }

        ranking::sort_results(&mut scored);
        scored.truncate(k as usize);

        let mut results = Vec::with_capacity(scored.len());
        for (memory, score) in scored {
            self.storage.update_last_accessed(&memory.id, now)?;
            let explanation = ranking::explain(&memory, score, false);
            results.push(SearchResult {
                memory,
                score,
                explanation,
            });
        }
        Ok(results)
    }

    fn keyword_search(
        &self,
        project_id: &str,
        query: &str,
        k: u32,
        options: &SearchOptions,
    ) -> MemoryForgeResult<Vec<SearchResult>> {
        let kws = keyword::keywords(query);
        let filter = ListMemoriesFilter {
            confirmed_only: options.confirmed_only,
            memory_type: options.memory_type,
            include_archived: false,
            limit: Some(KEYWORD_FALLBACK_CANDIDATE_CAP),
            offset: None,
        };
        let candidates = self.storage.list_memories(project_id, &filter)?;

        let now = Utc::now();
        let mut scored: Vec<(Memory, f64)> = candidates
            .into_iter()
            .filter(|m| !(options.exclude_stale && m.is_stale))
            .map(|m| {
                let score = keyword::keyword_score(&m.content, &kws);
                (m, score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        ranking::sort_results(&mut scored);
        scored.truncate(k as usize);

        let mut results = Vec::with_capacity(scored.len());
        for (memory, score) in scored {
            self.storage.update_last_accessed(&memory.id, now)?;
            let explanation = ranking::explain(&memory, score, true);
            results.push(SearchResult {
                memory,
                score,
                explanation,
            });
        }
        Ok(results)
    }

    /// Newest-first confirmed, non-archived memories. Never touches `last_accessed`.
    pub fn get_timeline(&self, project_id: &str, limit: u32) -> MemoryForgeResult<Vec<Memory>> {
        let filter = ListMemoriesFilter {
            confirmed_only: true,
            memory_type: None,
            include_archived: false,
            limit: Some(limit),
            offset: None,
        };
        let mut memories = self.storage.list_memories(project_id, &filter)?;
        memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        memories.truncate(limit as usize);
        Ok(memories)
    }
}
