//! Actionable recommendations based on system health.
//!
//! Examples: "62 memories are pending confirmation", "sync hasn't run in 9 days".

use serde::{Deserialize, Serialize};

use super::reporter::HealthSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub message: String,
    pub action: String,
}

/// Generate recommendations from the current health snapshot.
pub fn generate(snapshot: &HealthSnapshot) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    let pending = snapshot.pending_count();
    if pending > 0 && snapshot.total_memories > 0 {
        let ratio = pending as f64 / snapshot.total_memories as f64;
        let severity = if ratio > 0.5 { Severity::Warning } else { Severity::Info };
        recs.push(Recommendation {
            severity,
            message: format!("{pending} memories are pending confirmation"),
            action: "confirm or delete pending memories".into(),
        });
    }

    if let Some(last) = snapshot.last_sync_time {
        let age_days = (chrono::Utc::now() - last).num_days();
        if age_days > 7 {
            recs.push(Recommendation {
                severity: Severity::Warning,
                message: format!("sync hasn't run in {age_days} days"),
                action: "run a push/pull cycle".into(),
            });
        }
    }

    if snapshot.total_memories > 0 {
        let archived_ratio = snapshot.archived_memories as f64 / snapshot.total_memories as f64;
        if archived_ratio > 0.8 {
            recs.push(Recommendation {
                severity: Severity::Info,
                message: format!("{:.0}% of memories are archived", archived_ratio * 100.0),
                action: "no action needed; informational only".into(),
            });
        }
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_recommendations_for_an_empty_project() {
        assert!(generate(&HealthSnapshot::default()).is_empty());
    }

    #[test]
    fn flags_a_majority_pending_backlog_as_a_warning() {
        let snapshot = HealthSnapshot {
            total_memories: 10,
            confirmed_memories: 2,
            ..Default::default()
        };
        let recs = generate(&snapshot);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].severity, Severity::Warning);
    }

    #[test]
    fn flags_a_stale_sync() {
        let snapshot = HealthSnapshot {
            last_sync_time: Some(chrono::Utc::now() - chrono::Duration::days(9)),
            ..Default::default()
        };
        let recs = generate(&snapshot);
        assert!(recs.iter().any(|r| r.message.contains("sync hasn't run")));
    }
}
