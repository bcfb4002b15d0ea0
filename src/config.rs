//! Server configuration
//!
//! Loaded from an optional YAML file; command-line flags are applied on top.

use crate::rdf::{FormatEntry, FormatRegistry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for [`ServerConfig`]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fixed-window rate limit applied per client IP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in seconds
    pub window_secs: u64,
    /// Requests allowed per client within one window
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 100,
        }
    }
}

/// Conversion output buffering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Size of each output chunk. Errors inside the first chunk become a 500.
    pub chunk_bytes: usize,
    /// Chunks buffered between the engine and the response
    pub channel_depth: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: 64 * 1024,
            channel_depth: 4,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port (None = pick a free port)
    pub port: Option<u16>,
    /// Directory holding the RDF documents
    pub base_dir: PathBuf,
    /// Serve containment listings for paths ending in `/`
    pub containment: bool,
    /// Per-client rate limit
    pub rate_limit: RateLimitConfig,
    /// Output buffering
    pub transform: TransformConfig,
    /// Extra serializations, added to or overriding the built-in table
    pub formats: Vec<FormatEntry>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: None,
            base_dir: PathBuf::from("."),
            containment: false,
            rate_limit: RateLimitConfig::default(),
            transform: TransformConfig::default(),
            formats: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: ServerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Invalid("rate_limit.window_secs must be positive".to_string()));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid("rate_limit.max_requests must be positive".to_string()));
        }
        if self.transform.chunk_bytes == 0 || self.transform.channel_depth == 0 {
            return Err(ConfigError::Invalid(
                "transform.chunk_bytes and transform.channel_depth must be positive".to_string(),
            ));
        }
        if let Some(entry) = self.formats.iter().find(|f| f.content_type.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "format entry for extensions {:?} has an empty content_type",
                entry.extensions
            )));
        }
        Ok(())
    }

    /// Built-in formats plus the configured ones
    pub fn format_registry(&self) -> FormatRegistry {
        let mut registry = FormatRegistry::new();
        for entry in &self.formats {
            registry.register(entry.clone());
        }
        registry
    }
}
