use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::MemoryForgeResult;

/// Which backend E should use to turn text into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    Remote,
    Local,
}

impl Default for EmbeddingProviderKind {
    fn default() -> Self {
        Self::Local
    }
}

impl fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Local => f.write_str("local"),
        }
    }
}

fn default_storage_path() -> PathBuf {
    dirs_home().join(".memoryforge")
}

fn dirs_home() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_project_name() -> String {
    "default".to_string()
}

fn default_project_root() -> String {
    ".".to_string()
}

fn default_local_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_remote_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_max_results() -> u32 {
    5
}

fn default_min_score() -> f64 {
    0.5
}

fn default_consolidation_threshold() -> f64 {
    0.90
}

fn default_sync_backend() -> String {
    "local".to_string()
}

/// The full set of settings the engine loads at startup, mirrored 1:1 from
/// the on-disk YAML file at `~/.memoryforge/config.yaml` unless overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryForgeConfig {
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_project_root")]
    pub project_root: String,

    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    #[serde(default)]
    pub embedding_provider: EmbeddingProviderKind,
    #[serde(default)]
    pub remote_api_key: String,
    #[serde(default = "default_remote_embedding_model")]
    pub remote_embedding_model: String,
    #[serde(default = "default_local_embedding_model")]
    pub local_embedding_model: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    pub active_project_id: Option<String>,

    #[serde(default)]
    pub enable_commit_integration: bool,

    #[serde(default = "default_consolidation_threshold")]
    pub consolidation_threshold: f64,

    pub sync_key: Option<String>,
    pub sync_path: Option<PathBuf>,
    #[serde(default = "default_sync_backend")]
    pub sync_backend: String,
}

impl Default for MemoryForgeConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            project_root: default_project_root(),
            storage_path: default_storage_path(),
            embedding_provider: EmbeddingProviderKind::default(),
            remote_api_key: String::new(),
            remote_embedding_model: default_remote_embedding_model(),
            local_embedding_model: default_local_embedding_model(),
            max_results: default_max_results(),
            min_score: default_min_score(),
            active_project_id: None,
            enable_commit_integration: false,
            consolidation_threshold: default_consolidation_threshold(),
            sync_key: None,
            sync_path: None,
            sync_backend: default_sync_backend(),
        }
    }
}

impl MemoryForgeConfig {
    /// Default location of the config file: `~/.memoryforge/config.yaml`.
    pub fn default_config_path() -> PathBuf {
        default_storage_path().join("config.yaml")
    }

    /// Load from `path`, or `default_config_path()` if `path` is `None`.
    /// Returns the default configuration if the file does not exist.
    pub fn load(path: Option<&Path>) -> MemoryForgeResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    /// Persist to `path`, or `storage_path/config.yaml` if `path` is `None`.
    pub fn save(&self, path: Option<&Path>) -> MemoryForgeResult<()> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.storage_path.join("config.yaml"));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_yaml::to_string(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.storage_path.join("sqlite").join("memoryforge.db")
    }

    pub fn vector_index_path(&self) -> PathBuf {
        self.storage_path.join("vectors")
    }

    pub fn logs_path(&self) -> PathBuf {
        self.storage_path.join("logs")
    }

    /// Create every directory the engine expects to write into.
    pub fn ensure_directories(&self) -> MemoryForgeResult<()> {
        std::fs::create_dir_all(&self.storage_path)?;
        if let Some(parent) = self.sqlite_path().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(self.vector_index_path())?;
        std::fs::create_dir_all(self.logs_path())?;
        Ok(())
    }
}
