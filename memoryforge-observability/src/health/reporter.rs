//! Aggregate health report generation: schema version, memory counts,
//! pending count, and last sync time, pulled straight off `MemoryStorage`
//! and the caller's own record of the last successful `pull`/`push`.

use chrono::{DateTime, Utc};

use super::recommendations::{self, Recommendation};
use super::subsystem_checks::SubsystemChecker;

/// Overall or per-subsystem health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubsystemHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

/// Everything needed to build a report, gathered by the caller before
/// calling `HealthReporter::build`.
#[derive(Debug, Clone, Default)]
pub struct HealthSnapshot {
    pub schema_version: u32,
    pub total_memories: u64,
    pub confirmed_memories: u64,
    pub archived_memories: u64,
    /// When the last successful `push` or `pull` completed, if sync has ever run.
    pub last_sync_time: Option<DateTime<Utc>>,
}

impl HealthSnapshot {
    pub fn pending_count(&self) -> u64 {
        self.total_memories.saturating_sub(self.confirmed_memories)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub subsystems: Vec<SubsystemHealth>,
    pub schema_version: u32,
    pub total_memories: u64,
    pub confirmed_memories: u64,
    pub pending_count: u64,
    pub archived_memories: u64,
    pub last_sync_time: Option<DateTime<Utc>>,
}

pub struct HealthReporter;

impl HealthReporter {
    pub fn build(snapshot: &HealthSnapshot) -> HealthReport {
        let subsystems = SubsystemChecker::check_all(snapshot);
        let overall_status = Self::derive_overall(&subsystems);

        HealthReport {
            overall_status,
            subsystems,
            schema_version: snapshot.schema_version,
            total_memories: snapshot.total_memories,
            confirmed_memories: snapshot.confirmed_memories,
            pending_count: snapshot.pending_count(),
            archived_memories: snapshot.archived_memories,
            last_sync_time: snapshot.last_sync_time,
        }
    }

    pub fn recommendations(snapshot: &HealthSnapshot) -> Vec<Recommendation> {
        recommendations::generate(snapshot)
    }

    /// Unhealthy if any subsystem is unhealthy, degraded if any is degraded,
    /// otherwise healthy.
    fn derive_overall(subsystems: &[SubsystemHealth]) -> HealthStatus {
        let mut worst = HealthStatus::Healthy;
        for s in subsystems {
            match s.status {
                HealthStatus::Unhealthy => return HealthStatus::Unhealthy,
                HealthStatus::Degraded => worst = HealthStatus::Degraded,
                HealthStatus::Healthy => {}
            }
        }
        worst
    }
}
