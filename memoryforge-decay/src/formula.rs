//! Weighted-average confidence formula: four factors, 0.25 each.
//!
//! ```text
//! score = 0.25 * confirmation + 0.25 * recency + 0.25 * usage + 0.25 * conflict
//! ```
//!
//! Result is clamped to `[0.0, 1.0]`.

use chrono::{DateTime, Utc};

const RECENCY_HALF_LIFE_DAYS: f64 = 30.0;
const WEIGHT: f64 = 0.25;

fn confirmation_score(confirmed: bool) -> f64 {
    if confirmed { 1.0 } else { 0.3 }
}

/// Exponential decay with a 30-day half-life against `reference`
/// (`last_accessed ?? created_at`).
fn recency_score(reference: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now - reference).num_seconds().max(0) as f64 / 86400.0;
    0.5_f64.powf(days / RECENCY_HALF_LIFE_DAYS)
}

fn usage_score(last_accessed: Option<DateTime<Utc>>) -> f64 {
    if last_accessed.is_some() { 0.8 } else { 0.5 }
}

fn conflict_score(conflict_count: u32) -> f64 {
    match conflict_count {
        0 => 1.0,
        1 => 0.7,
        2..=3 => 0.5,
        _ => 0.3,
    }
}

/// Per-factor breakdown, useful for observability/debugging.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceBreakdown {
    pub confirmation: f64,
    pub recency: f64,
    pub usage: f64,
    pub conflict: f64,
    pub score: f64,
}

pub fn compute_breakdown(
    confirmed: bool,
    created_at: DateTime<Utc>,
    last_accessed: Option<DateTime<Utc>>,
    conflict_count: u32,
    now: DateTime<Utc>,
) -> ConfidenceBreakdown {
    let confirmation = confirmation_score(confirmed);
    let recency = recency_score(last_accessed.unwrap_or(created_at), now);
    let usage = usage_score(last_accessed);
    let conflict = conflict_score(conflict_count);

    let score = (WEIGHT * confirmation + WEIGHT * recency + WEIGHT * usage + WEIGHT * conflict).clamp(0.0, 1.0);

    ConfidenceBreakdown {
        confirmation,
        recency,
        usage,
        conflict,
        score,
    }
}

pub fn compute(
    confirmed: bool,
    created_at: DateTime<Utc>,
    last_accessed: Option<DateTime<Utc>>,
    conflict_count: u32,
    now: DateTime<Utc>,
) -> f64 {
    compute_breakdown(confirmed, created_at, last_accessed, conflict_count, now).score
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn unconfirmed_never_accessed_no_conflicts_scores_midrange() {
        let now = Utc::now();
        let score = compute(false, now, None, 0, now);
        // 0.25*0.3 + 0.25*1.0 + 0.25*0.5 + 0.25*1.0 = 0.7
        assert!((score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn confirmed_recently_accessed_no_conflicts_scores_near_one() {
        let now = Utc::now();
        let score = compute(true, now, Some(now), 0, now);
        // 0.25*1.0 + 0.25*1.0 + 0.25*0.8 + 0.25*1.0 = 0.95
        assert!((score - 0.95).abs() < 1e-9);
    }

    #[test]
    fn recency_halves_every_thirty_days() {
        let now = Utc::now();
        let reference = now - Duration::days(30);
        assert!((recency_score(reference, now) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn conflict_buckets_match_the_spec_thresholds() {
        assert_eq!(conflict_score(0), 1.0);
        assert_eq!(conflict_score(1), 0.7);
        assert_eq!(conflict_score(2), 0.5);
        assert_eq!(conflict_score(3), 0.5);
        assert_eq!(conflict_score(4), 0.3);
    }

    #[test]
    fn score_is_always_clamped() {
        let now = Utc::now();
        let very_old = now - Duration::days(100_000);
        let score = compute(false, very_old, None, 10, now);
        assert!((0.0..=1.0).contains(&score));
    }
}
