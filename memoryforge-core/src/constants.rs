/// Crate version, re-exported for diagnostics and the health report.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum content length, in characters, after trimming.
pub const MIN_CONTENT_LEN: usize = 1;

/// Maximum content length, in characters, after sanitization. See §3 of the data model.
pub const MAX_CONTENT_LEN: usize = 10_240;

/// Nominal embedding dimension of the bundled local provider.
pub const LOCAL_EMBEDDING_DIMENSION: usize = 384;

/// Nominal embedding dimension of the default remote provider.
pub const REMOTE_EMBEDDING_DIMENSION: usize = 1536;

/// Embedding provider retry policy (§4.3): up to this many attempts total.
pub const EMBEDDING_MAX_ATTEMPTS: u32 = 3;

/// Base backoff delay for embedding provider retries, in milliseconds.
pub const EMBEDDING_RETRY_BASE_MS: u64 = 1_000;

/// Backoff multiplier applied after each failed embedding attempt.
pub const EMBEDDING_RETRY_FACTOR: u64 = 2;

/// Lower bound of the consolidation confidence threshold accepted by config.
pub const CONSOLIDATION_THRESHOLD_MIN: f64 = 0.7;

/// Upper bound of the consolidation confidence threshold accepted by config.
pub const CONSOLIDATION_THRESHOLD_MAX: f64 = 0.99;

/// Number of characters of a project id used to derive its vector collection name.
pub const PROJECT_COLLECTION_PREFIX_LEN: usize = 8;
