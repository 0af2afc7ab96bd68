//! Structured logging setup, health reporting, and span macros for the
//! engine's R/V/E/M/Con/Sync/Mig call sites.

pub mod health;
pub mod tracing_setup;

pub use health::{HealthReport, HealthReporter, HealthSnapshot, HealthStatus, Recommendation, Severity, SubsystemHealth};

/// Install a global `tracing` subscriber that writes JSON lines to stderr,
/// filterable via `RUST_LOG`. Call once at process startup; a second call
/// is a no-op rather than a panic.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
