//! Configuration management for ontoserve.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `ontoserve.toml` file
//! 3. User config `~/.config/ontoserve/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Graph store configuration.
    pub store: StoreConfig,

    /// Search index configuration.
    pub search: SearchConfig,

    /// Pagination limits.
    pub pagination: PaginationConfig,

    /// Ontology ranking and download restrictions.
    pub ranking: RankingConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./ontoserve.toml` (project local)
    /// 2. `~/.config/ontoserve/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::from_file(path),
            None => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Find the config file `load` would read, if any.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.default_page_size == 0 {
            return Err(ConfigError::Invalid(
                "pagination.default_page_size must be positive".to_string(),
            ));
        }
        if self.pagination.max_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "pagination.max_page_size ({}) exceeds the hard limit of {}",
                self.pagination.max_page_size, MAX_PAGE_SIZE
            )));
        }
        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "pagination.default_page_size ({}) exceeds pagination.max_page_size ({})",
                self.pagination.default_page_size, self.pagination.max_page_size
            )));
        }
        match self.store.backend.as_str() {
            "memory" | "surreal" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown store backend '{}'",
                    other
                )))
            }
        }
        match self.search.backend.as_str() {
            "memory" | "solr" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown search backend '{}'",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(host) = std::env::var("ONTOSERVE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("ONTOSERVE_PORT") {
            if let Ok(n) = port.parse() {
                self.server.port = n;
            }
        }

        // Store overrides
        if let Ok(backend) = std::env::var("ONTOSERVE_STORE_BACKEND") {
            self.store.backend = backend;
        }
        if let Ok(seed) = std::env::var("ONTOSERVE_SEED") {
            self.store.seed_path = Some(seed);
        }
        if let Ok(path) = std::env::var("ONTOSERVE_DB_PATH") {
            self.store.db_path = path;
        }

        // Search overrides
        if let Ok(backend) = std::env::var("ONTOSERVE_SEARCH_BACKEND") {
            self.search.backend = backend;
        }
        if let Ok(url) = std::env::var("ONTOSERVE_SOLR_URL") {
            self.search.solr_url = url;
        }

        // Logging overrides
        if let Ok(filter) = std::env::var("ONTOSERVE_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors: true,
        }
    }
}

/// Graph store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend name: "memory" or "surreal".
    pub backend: String,

    /// JSON snapshot loaded by the "memory" backend.
    pub seed_path: Option<String>,

    /// Database directory for the "surreal" backend.
    pub db_path: String,

    /// Prefix of ontology and submission identifiers.
    pub iri_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_STORE_BACKEND.to_string(),
            seed_path: None,
            db_path: DEFAULT_DB_PATH.to_string(),
            iri_prefix: DEFAULT_IRI_PREFIX.to_string(),
        }
    }
}

/// One weighted index field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryField {
    pub field: String,
    pub weight: f32,
}

/// Search index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Backend name: "memory" or "solr".
    pub backend: String,

    /// Solr core URL.
    pub solr_url: String,

    /// Maximum hits fetched from the index for one query.
    pub max_hits: usize,

    /// Fields searched and their weights.
    pub query_fields: Vec<QueryField>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_SEARCH_BACKEND.to_string(),
            solr_url: DEFAULT_SOLR_URL.to_string(),
            max_hits: DEFAULT_MAX_HITS,
            query_fields: DEFAULT_QUERY_FIELDS
                .iter()
                .map(|(field, weight)| QueryField {
                    field: field.to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }
}

/// Pagination limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when a request omits `size`.
    pub default_page_size: usize,

    /// Largest accepted `size`.
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Process-wide ranking table and download restrictions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Ontologies whose submissions may not be downloaded.
    pub restrict_download: Vec<String>,

    /// Search tie-break weight per ontology acronym.
    pub ontology_rank: BTreeMap<String, i64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}
