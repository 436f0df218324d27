//! Configuration loading, validation, and management for QuantaSynapse.
//!
//! Loads settings from `./quanta.toml` (or the file named by `QUANTA_CONFIG`)
//! with environment variable overrides. The connection parameters are handed
//! to the facade as-is; only the node-level settings are validated here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root settings structure.
///
/// Maps directly to `quanta.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynapseSettings {
    /// Connection parameters passed through to the transport
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Heartbeat configuration
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,

    /// Identity and simulated connection behaviour
    #[serde(default)]
    pub node: NodeConfig,
}

/// Connection parameters.
///
/// Not validated by the facade; the transport owns that.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: u16,

    /// Opaque credential, never logged
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 0,
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &str) -> &'static str {
    if s.is_empty() { "None" } else { "[REDACTED]" }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_heartbeat_interval")]
    pub interval_ms: u64,
}

fn default_heartbeat_interval() -> u64 {
    5_000
}
fn default_true() -> bool {
    true
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_heartbeat_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Sender name stamped on heartbeats
    #[serde(default = "default_identity")]
    pub identity: String,

    /// Simulated setup delay spent in `Connecting`
    #[serde(default = "default_connect_delay")]
    pub connect_delay_ms: u64,
}

fn default_identity() -> String {
    "QuantaSynapse".into()
}
fn default_connect_delay() -> u64 {
    1_000
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            connect_delay_ms: default_connect_delay(),
        }
    }
}

impl SynapseSettings {
    /// Load settings from `$QUANTA_CONFIG`, falling back to `./quanta.toml`.
    ///
    /// Environment overrides (highest priority):
    /// - `QUANTA_API_KEY`
    /// - `QUANTA_HOST`
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("QUANTA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        let mut settings = Self::load_from(&path)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Apply `QUANTA_API_KEY` and `QUANTA_HOST` over the loaded values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("QUANTA_API_KEY") {
            self.connection.api_key = key;
        }

        if let Ok(host) = std::env::var("QUANTA_HOST") {
            self.connection.host = host;
        }
    }

    /// Load settings from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { reason, .. } => ConfigError::ParseError {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from("quanta.toml")
    }

    /// Validate the node-level settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat.enabled && self.heartbeat.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "heartbeat.interval_ms must be > 0 when the heartbeat is enabled".into(),
            ));
        }

        if self.node.identity.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "node.identity must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default settings TOML string.
    pub fn default_toml() -> String {
        let settings = Self::default();
        toml::to_string_pretty(&settings).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
