use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO) or `auto`
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Chunking limits for multiplexed requests
    #[serde(default)]
    pub batching: BatchConfig,

    /// Remote subtitle download settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Artifact store locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    // @field: Service URL
    #[serde(default = "default_backend_endpoint")]
    pub endpoint: String,

    // @field: Per-call timeout in seconds
    #[serde(default = "default_backend_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Idle pooled connections kept per host
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,

    // @field: Seconds before an idle pooled connection is closed
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    // @field: Skip TLS certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_backend_endpoint(),
            timeout_secs: default_backend_timeout_secs(),
            max_idle_connections: default_max_idle_connections(),
            idle_timeout_secs: default_idle_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

/// Chunking limits
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchConfig {
    // @field: Max items per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    // @field: Max code points per chunk
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    // @field: Max code points sent for one text
    #[serde(default = "default_max_single_text_chars")]
    pub max_single_text_chars: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            max_chunk_chars: default_max_chunk_chars(),
            max_single_text_chars: default_max_single_text_chars(),
        }
    }
}

/// Remote subtitle download configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FetchConfig {
    // @field: Request timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,

    // @field: User-Agent header sent with every download
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Skip TLS certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
            accept_invalid_certs: false,
        }
    }
}

/// Artifact store configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageConfig {
    // @field: SQLite database file, empty for the platform data dir
    #[serde(default)]
    pub database_path: String,

    // @field: Directory holding translated files, empty for the platform data dir
    #[serde(default)]
    pub storage_dir: String,
}

impl StorageConfig {
    /// Resolve the database file location
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        if self.database_path.trim().is_empty() {
            crate::database::connection::DatabaseConnection::default_database_path()
        } else {
            Ok(PathBuf::from(&self.database_path))
        }
    }

    /// Resolve the translated-files directory
    pub fn resolve_storage_dir(&self) -> Result<PathBuf> {
        if self.storage_dir.trim().is_empty() {
            crate::database::files::ContentStore::default_storage_dir()
        } else {
            Ok(PathBuf::from(&self.storage_dir))
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    language_utils::AUTO_DETECT.to_string()
}

fn default_target_language() -> String {
    "id".to_string()
}

fn default_backend_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_backend_timeout_secs() -> u64 {
    10
}

fn default_max_idle_connections() -> usize {
    100
}

fn default_idle_timeout_secs() -> u64 {
    90
}

fn default_chunk_size() -> usize {
    80
}

fn default_max_chunk_chars() -> usize {
    1800
}

fn default_max_single_text_chars() -> usize {
    1400
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string()
}

impl Config {
    /// Load the configuration file, writing a default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_source_language(&self.source_language)?;
        language_utils::validate_target_language(&self.target_language)?;

        if self.backend.endpoint.trim().is_empty() {
            return Err(anyhow!("Translation backend endpoint is required"));
        }
        url::Url::parse(&self.backend.endpoint)
            .context(format!("Invalid backend endpoint: {}", self.backend.endpoint))?;

        if self.backend.timeout_secs == 0 || self.fetch.timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be greater than zero"));
        }

        if self.batching.chunk_size == 0
            || self.batching.max_chunk_chars == 0
            || self.batching.max_single_text_chars == 0
        {
            return Err(anyhow!("Batching limits must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            backend: BackendConfig::default(),
            batching: BatchConfig::default(),
            fetch: FetchConfig::default(),
            storage: StorageConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
