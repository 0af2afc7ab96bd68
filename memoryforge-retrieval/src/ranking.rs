//! Re-ranking: `final = min(1.0, base + recency + type_priority + confidence)`.
//!
//! A much smaller cousin of the teacher's 8-factor scorer — this system's
//! re-rank formula has exactly three adjustment terms on top of the vector
//! or keyword base score.

use chrono::{DateTime, Utc};

use memoryforge_core::memory::{Memory, MemoryType};

fn type_priority(memory_type: MemoryType) -> f64 {
    match memory_type {
        MemoryType::Stack => 1.0,
        MemoryType::Decision => 0.9,
        MemoryType::Constraint => 0.8,
        MemoryType::Convention => 0.7,
        MemoryType::Note => 0.5,
    }
}

fn recency_term(memory: &Memory, now: DateTime<Utc>) -> f64 {
    let age_days = (now - memory.created_at).num_seconds() as f64 / 86_400.0;
    0.1 * (1.0 - age_days / 30.0).max(0.0)
}

fn confidence_term(memory: &Memory) -> f64 {
    (memory.confidence_score.value() - 0.5) * 0.1
}

/// Re-rank `base_score` (vector similarity or keyword match fraction) for
/// `memory`, clamped to `[0.0, 1.0]`.
pub fn rerank(memory: &Memory, base_score: f64, now: DateTime<Utc>) -> f64 {
    let final_score = base_score
        + recency_term(memory, now)
        + type_priority(memory.memory_type) * 0.05
        + confidence_term(memory);
    final_score.min(1.0)
}

fn similarity_qualifier(score: f64) -> &'static str {
    if score >= 0.85 {
        "highly relevant"
    } else if score >= 0.7 {
        "relevant"
    } else {
        "partially relevant"
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build the human-readable explanation for a returned result, starting
/// with the memory's bracketed, capitalized type (e.g. `[Stack]`).
pub fn explain(memory: &Memory, score: f64, keyword_match: bool) -> String {
    let qualifier = if keyword_match {
        "keyword match"
    } else {
        similarity_qualifier(score)
    };
    format!(
        "[{type}] ({qualifier}, score {score:.2}, stored {date})",
        type = capitalize(memory.memory_type.as_str()),
        date = memory.created_at.format("%Y-%m-%d"),
    )
}

/// Stable sort: score descending, ties broken by newer `created_at` first.
pub fn sort_results(results: &mut [(Memory, f64)]) {
    results.sort_by(|(mem_a, score_a), (mem_b, score_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| mem_b.created_at.cmp(&mem_a.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoryforge_core::memory::MemorySource;

    fn memory_at(age_days: i64, memory_type: MemoryType, confidence: f64) -> Memory {
        let now = Utc::now();
        let mut m = Memory::new(
            "m1".into(),
            "p1".into(),
            "content".into(),
            memory_type,
            MemorySource::Manual,
            now - chrono::Duration::days(age_days),
        );
        m.confidence_score = confidence.into();
        m
    }

    #[test]
    fn fresh_high_priority_high_confidence_scores_highest() {
        let now = Utc::now();
        let fresh = memory_at(0, MemoryType::Stack, 1.0);
        let stale = memory_at(60, MemoryType::Note, 0.0);
        assert!(rerank(&fresh, 0.7, now) > rerank(&stale, 0.7, now));
    }

    #[test]
    fn score_never_exceeds_one() {
        let now = Utc::now();
        let m = memory_at(0, MemoryType::Stack, 1.0);
        assert!(rerank(&m, 1.0, now) <= 1.0);
    }

    #[test]
    fn recency_decays_to_zero_past_thirty_days() {
        let now = Utc::now();
        let old = memory_at(45, MemoryType::Note, 0.5);
        let new = memory_at(45, MemoryType::Note, 0.5);
        assert_eq!(rerank(&old, 0.5, now), rerank(&new, 0.5, now));
        assert_eq!(recency_term(&old, now), 0.0);
    }

    #[test]
    fn qualifier_thresholds() {
        assert_eq!(similarity_qualifier(0.9), "highly relevant");
        assert_eq!(similarity_qualifier(0.75), "relevant");
        assert_eq!(similarity_qualifier(0.2), "partially relevant");
    }

    #[test]
    fn sort_breaks_ties_by_newer_created_at() {
        let older = memory_at(10, MemoryType::Note, 0.5);
        let newer = memory_at(1, MemoryType::Note, 0.5);
        let mut results = vec![(older.clone(), 0.5), (newer.clone(), 0.5)];
        sort_results(&mut results);
        assert_eq!(results[0].0.id, newer.id);
    }
}
