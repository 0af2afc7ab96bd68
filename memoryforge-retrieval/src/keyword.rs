//! Keyword-scan fallback used when the embedding provider or vector index
//! fails partway through a search.

use std::collections::HashSet;

/// Lower-cased, deduplicated keywords from a query, splitting on whitespace.
pub fn keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}

/// Fraction of `keywords` found in `content` (case-insensitive substring
/// match), scaled by 0.7 and capped at 1.0, per the keyword-fallback formula.
pub fn keyword_score(content: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let content = content.to_lowercase();
    let matches = keywords.iter().filter(|k| content.contains(k.as_str())).count();
    (matches as f64 / keywords.len() as f64 * 0.7).min(1.0)
}
