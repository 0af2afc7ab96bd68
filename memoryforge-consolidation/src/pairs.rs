//! Pairwise near-duplicate discovery and greedy merge suggestion.

use std::collections::HashSet;

use memoryforge_core::traits::{EmbeddingProvider, ListMemoriesFilter, MemoryStorage, VectorIndex};

use crate::types::{ConsolidationSuggestion, SimilarPair};

const CANDIDATE_CAP: u32 = 500;
const NEIGHBORS_PER_MEMORY: usize = 10;

fn canonical_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Scan confirmed, non-archived memories for near-duplicate pairs whose
/// cosine similarity clears `threshold`, deduped and sorted descending by
/// score, truncated to `limit`.
pub fn find_similar_pairs(
    storage: &dyn MemoryStorage,
    vector: &dyn VectorIndex,
    embedder: &dyn EmbeddingProvider,
    project_id: &str,
    threshold: f64,
    limit: usize,
) -> memoryforge_core::errors::MemoryForgeResult<Vec<SimilarPair>> {
    let candidates = storage.list_memories(
        project_id,
        &ListMemoriesFilter {
            confirmed_only: true,
            include_archived: false,
            limit: Some(CANDIDATE_CAP),
            ..Default::default()
        },
    )?;

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut pairs = Vec::new();

    for memory in &candidates {
        let vec = embedder.generate(&memory.content)?;
        let hits = vector.search(&vec, NEIGHBORS_PER_MEMORY, None, threshold as f32)?;
        for (other_id, score, _payload) in hits {
            if other_id == memory.id {
                continue;
            }
            let key = canonical_key(&memory.id, &other_id);
            if seen.contains(&key) {
                continue;
            }
            let Some(other) = candidates.iter().find(|m| m.id == other_id) else {
                continue;
            };
            if other.is_archived {
                continue;
            }
            seen.insert(key);
            pairs.push(SimilarPair {
                a: memory.id.clone(),
                b: other.id.clone(),
                score: score as f64,
            });
        }
    }

    pairs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    pairs.truncate(limit);
    Ok(pairs)
}

/// Greedily walk `pairs` score-descending, skipping any pair that touches
/// a memory already claimed by an earlier, higher-scoring suggestion, and
/// produce a suggested merge for each surviving pair.
pub fn suggest_from_pairs(
    storage: &dyn MemoryStorage,
    pairs: &[SimilarPair],
    n: usize,
) -> memoryforge_core::errors::MemoryForgeResult<Vec<ConsolidationSuggestion>> {
    let mut used: HashSet<String> = HashSet::new();
    let mut suggestions = Vec::new();

    for pair in pairs {
        if suggestions.len() >= n {
            break;
        }
        if used.contains(&pair.a) || used.contains(&pair.b) {
            continue;
        }
        let Some(a) = storage.get_memory(&pair.a)? else { continue };
        let Some(b) = storage.get_memory(&pair.b)? else { continue };
        if a.is_archived || b.is_archived {
            continue;
        }

        let (older, newer) = if a.created_at <= b.created_at { (&a, &b) } else { (&b, &a) };
        let suggested_content = if newer.content.trim() == older.content.trim() {
            older.content.clone()
        } else {
            format!("{}\n{}", older.content.trim(), newer.content.trim())
        };

        used.insert(pair.a.clone());
        used.insert(pair.b.clone());
        suggestions.push(ConsolidationSuggestion {
            sources: [pair.a.clone(), pair.b.clone()],
            score: pair.score,
            suggested_content,
            memory_type: newer.memory_type,
        });
    }

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::canonical_key;

    #[test]
    fn canonical_key_is_order_independent() {
        assert_eq!(canonical_key("a", "b"), canonical_key("b", "a"));
    }
}
