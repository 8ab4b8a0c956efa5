//! Configuration loading for tasks-client.
//!
//! Configuration is loaded from a TOML file (default: `tasks.toml` in the
//! host's config directory). Every field has a default, so an empty file or
//! no file at all is valid.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for offline-tasks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Connectivity monitor configuration.
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    /// Remote sync configuration.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Durable storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Connectivity monitor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityConfig {
    /// URL probed with `HEAD` to decide reachability. Without one the host
    /// treats the remote as always reachable.
    pub probe_url: Option<String>,
    /// Interval between periodic probes in milliseconds (default: 3000).
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    /// Probe timeout in milliseconds (default: 2000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

/// Which remote implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteBackend {
    /// In-process stand-in with random latency.
    #[default]
    Simulated,
    /// REST calls against `base_url`.
    Http,
}

/// Remote sync configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Backend (default: simulated).
    #[serde(default)]
    pub backend: RemoteBackend,
    /// Base URL of the task API (required for the http backend).
    pub base_url: Option<String>,
    /// Per-request timeout in milliseconds (default: 10000).
    #[serde(default = "default_remote_timeout_ms")]
    pub timeout_ms: u64,
    /// Lower bound of simulated latency in milliseconds (default: 200).
    #[serde(default = "default_min_latency_ms")]
    pub min_latency_ms: u64,
    /// Upper bound of simulated latency in milliseconds (default: 800).
    #[serde(default = "default_max_latency_ms")]
    pub max_latency_ms: u64,
    /// Probability in [0, 1] that a simulated call fails (default: 0).
    #[serde(default)]
    pub failure_rate: f64,
}

/// Which durable store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key.
    #[default]
    File,
    /// Single SQLite database.
    Sqlite,
    /// Process memory only.
    Memory,
}

/// Durable storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Backend (default: file).
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory (file backend) or database file (sqlite backend).
    /// Defaults to a location inside the host's data directory.
    pub path: Option<PathBuf>,
}

// Default value functions
fn default_probe_interval_ms() -> u64 {
    3000
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_remote_timeout_ms() -> u64 {
    10_000
}

fn default_min_latency_ms() -> u64 {
    200
}

fn default_max_latency_ms() -> u64 {
    800
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_url: None,
            probe_interval_ms: default_probe_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl ConnectivityConfig {
    /// Interval between periodic probes.
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    /// Upper bound on a single probe.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend: RemoteBackend::default(),
            base_url: None,
            timeout_ms: default_remote_timeout_ms(),
            min_latency_ms: default_min_latency_ms(),
            max_latency_ms: default_max_latency_ms(),
            failure_rate: 0.0,
        }
    }
}

impl StorageConfig {
    /// Resolve the storage location, falling back to `data_dir`.
    pub fn resolve_path(&self, data_dir: &Path) -> PathBuf {
        match (&self.path, self.backend) {
            (Some(path), _) => path.clone(),
            (None, StorageBackend::Sqlite) => data_dir.join("tasks.db"),
            (None, _) => data_dir.to_path_buf(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load configuration from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
