//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::StoreConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Streaming endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
}

fn default_heartbeat_interval() -> u64 {
    15
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval(),
        }
    }
}

impl StreamConfig {
    /// Heartbeat interval as a duration
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
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

impl LoggingConfig {
    /// Check if JSON output was requested
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, env_lookup)
    }

    fn load_with(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("emotibot-relay").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/emotibot-relay/config.toml"));
        paths.push(PathBuf::from("./config.toml"));
        paths
    }

    /// Load from the first candidate that exists, or defaults when none does
    ///
    /// Returns the path the config came from. A file that exists but cannot
    /// be read, parsed or validated is an error, not skipped.
    pub fn load_first(candidates: &[PathBuf]) -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_first_with(candidates, env_lookup)
    }

    fn load_first_with(
        candidates: &[PathBuf],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Ok((Self::load_with(path, lookup)?, Some(path.clone()))),
            None => Ok((Self::from_lookup(lookup)?, None)),
        }
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.default_mood.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.default_mood cannot be empty".to_string(),
            ));
        }
        if self.store.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "store.channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.store.max_subscribers == 0 {
            return Err(ConfigError::Invalid(
                "store.max_subscribers must be at least 1".to_string(),
            ));
        }
        if self.stream.heartbeat_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "stream.heartbeat_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        // Server overrides
        if let Some(host) = lookup("EMOTIBOT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("EMOTIBOT_PORT") {
            self.server.port = port.parse().map_err(|_| {
                ConfigError::Invalid(format!("EMOTIBOT_PORT is not a port: {}", port))
            })?;
        }

        // Store overrides
        if let Some(mood) = lookup("EMOTIBOT_DEFAULT_MOOD") {
            self.store.default_mood = mood;
        }

        // Stream overrides
        if let Some(secs) = lookup("EMOTIBOT_HEARTBEAT_SECS") {
            self.stream.heartbeat_interval_secs = secs.parse().map_err(|_| {
                ConfigError::Invalid(format!("EMOTIBOT_HEARTBEAT_SECS is not a number: {}", secs))
            })?;
        }

        // Logging overrides
        if let Some(level) = lookup("EMOTIBOT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("EMOTIBOT_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# EmotiBot Relay Configuration
#
# Environment variables override these settings:
# - EMOTIBOT_HOST
# - EMOTIBOT_PORT
# - EMOTIBOT_DEFAULT_MOOD
# - EMOTIBOT_HEARTBEAT_SECS
# - EMOTIBOT_LOG_LEVEL
# - EMOTIBOT_LOG_FORMAT

[server]
# HTTP server host
host = "0.0.0.0"

# HTTP server port
port = 8000

[store]
# Mood the relay starts with
default_mood = "neutral"

# Pending updates buffered per streaming client before updates are dropped
channel_capacity = 16

# Maximum number of concurrent streaming clients
max_subscribers = 1000

[stream]
# Seconds of inactivity before a keep-alive comment is sent
heartbeat_interval_secs = 15

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
