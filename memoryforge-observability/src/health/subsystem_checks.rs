//! Per-subsystem health checks: the relational store's confirmation backlog
//! and the sync engine's staleness. Each returns healthy | degraded | unhealthy.

use super::reporter::{HealthSnapshot, HealthStatus, SubsystemHealth};

/// A pull/push older than this is considered stale, not just "not yet run".
const SYNC_STALE_AFTER_DAYS: i64 = 7;

pub struct SubsystemChecker;

impl SubsystemChecker {
    pub fn check_all(snapshot: &HealthSnapshot) -> Vec<SubsystemHealth> {
        vec![Self::check_storage(snapshot), Self::check_sync(snapshot)]
    }

    /// Degraded once over half of all memories are unconfirmed; a persistent
    /// majority-pending backlog means confirmations aren't keeping up with intake.
    fn check_storage(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let (status, message) = if snapshot.total_memories == 0 {
            (HealthStatus::Healthy, None)
        } else {
            let pending_ratio = snapshot.pending_count() as f64 / snapshot.total_memories as f64;
            if pending_ratio > 0.5 {
                (
                    HealthStatus::Degraded,
                    Some(format!(
                        "{} of {} memories are unconfirmed",
                        snapshot.pending_count(),
                        snapshot.total_memories
                    )),
                )
            } else {
                (HealthStatus::Healthy, None)
            }
        };
        SubsystemHealth {
            name: "storage".into(),
            status,
            message,
        }
    }

    /// Never having synced is healthy (sync is optional); a sync that ran
    /// once and then stopped for a week is degraded.
    fn check_sync(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let (status, message) = match snapshot.last_sync_time {
            None => (HealthStatus::Healthy, None),
            Some(last) => {
                let age = chrono::Utc::now() - last;
                if age > chrono::Duration::days(SYNC_STALE_AFTER_DAYS) {
                    (
                        HealthStatus::Degraded,
                        Some(format!("last sync was {} days ago", age.num_days())),
                    )
                } else {
                    (HealthStatus::Healthy, None)
                }
            }
        };
        SubsystemHealth {
            name: "sync".into(),
            status,
            message,
        }
    }
}
