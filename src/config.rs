//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub influxdb: InfluxConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the store
#[derive(Debug, Clone, Deserialize)]
pub struct InfluxConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_url() -> String {
    "http://localhost:8086".to_string()
}

fn default_request_timeout() -> u64 {
    10_000 // 10 seconds
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            database: None,
            username: None,
            password: None,
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("influxql").join("config.toml")),
            Some(PathBuf::from("/etc/influxql/config.toml")),
            Some(PathBuf::from("./influxql.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Connection overrides
        if let Some(url) = lookup("INFLUXQL_URL") {
            self.influxdb.url = url;
        }
        if let Some(database) = lookup("INFLUXQL_DATABASE") {
            self.influxdb.database = Some(database);
        }
        if let Some(username) = lookup("INFLUXQL_USERNAME") {
            self.influxdb.username = Some(username);
        }
        if let Some(password) = lookup("INFLUXQL_PASSWORD") {
            self.influxdb.password = Some(password);
        }
        if let Some(timeout) = lookup("INFLUXQL_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.influxdb.request_timeout_ms = ms;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("INFLUXQL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("INFLUXQL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# influxql configuration
#
# Environment variables override these settings:
# - INFLUXQL_URL
# - INFLUXQL_DATABASE
# - INFLUXQL_USERNAME
# - INFLUXQL_PASSWORD
# - INFLUXQL_TIMEOUT_MS
# - INFLUXQL_LOG_LEVEL
# - INFLUXQL_LOG_FORMAT

[influxdb]
# Base URL of the InfluxDB 1.x HTTP API
url = "http://localhost:8086"

# Database used when a statement names none
# database = "telegraf"

# Basic-auth credentials
# username = ""
# password = ""

# Request timeout in milliseconds
request_timeout_ms = 10000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
