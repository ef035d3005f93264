//! TOML Configuration File Support
//!
//! Configuration for panel hosts, read from
//! `$XDG_CONFIG_HOME/chat-panel/panel.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [panel]
//! default_client_id = "acme"
//! channel_capacity = 256
//!
//! [store]
//! path = "/home/me/.local/share/chat-panel/preferences.json"
//! ```
//!
//! # Environment Variables
//!
//! - `CHAT_PANEL_CLIENT_ID`
//! - `CHAT_PANEL_CHANNEL_CAPACITY`
//! - `CHAT_PANEL_STORE_PATH`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::panel::DEFAULT_CLIENT_ID;
use crate::store::default_store_path;
use crate::transport::in_process::DEFAULT_CHANNEL_CAPACITY;

/// Environment variable overriding the default client id
pub const ENV_CLIENT_ID: &str = "CHAT_PANEL_CLIENT_ID";
/// Environment variable overriding the transport channel capacity
pub const ENV_CHANNEL_CAPACITY: &str = "CHAT_PANEL_CHANNEL_CAPACITY";
/// Environment variable overriding the preferences file
pub const ENV_STORE_PATH: &str = "CHAT_PANEL_STORE_PATH";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[panel]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelToml {
    /// Client id used when the cached profile has none
    pub default_client_id: Option<String>,

    /// Buffer size of the in-process transport channels
    pub channel_capacity: Option<usize>,
}

/// `[store]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreToml {
    /// Preferences file
    pub path: Option<PathBuf>,
}

/// Root of the TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatPanelToml {
    /// Panel settings
    pub panel: PanelToml,

    /// Preference store settings
    pub store: StoreToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration
#[derive(Clone, Debug)]
pub struct PanelConfig {
    /// Client id used when the cached profile has none
    pub default_client_id: String,

    /// Buffer size of the in-process transport channels
    pub channel_capacity: usize,

    /// Preferences file, if a data directory is known
    pub store_path: Option<PathBuf>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            default_client_id: DEFAULT_CLIENT_ID.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            store_path: default_store_path(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl PanelConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero channel capacity or
    /// a blank client id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.default_client_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_client_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/chat-panel/panel.toml` or
/// `~/.config/chat-panel/panel.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("chat-panel").join("panel.toml"))
}

/// Load configuration from the default path and the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resolved values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<PanelConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the resolved values are invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<PanelConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<PanelConfig, ConfigError> {
    let mut config = PanelConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ChatPanelToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut PanelConfig, toml: ChatPanelToml) {
    if let Some(client_id) = toml.panel.default_client_id {
        config.default_client_id = client_id;
    }
    if let Some(capacity) = toml.panel.channel_capacity {
        config.channel_capacity = capacity;
    }
    if toml.store.path.is_some() {
        config.store_path = toml.store.path;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut PanelConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(client_id) = env(ENV_CLIENT_ID) {
        config.default_client_id = client_id;
        config.source = ConfigSource::Env;
    }
    if let Some(capacity) = env(ENV_CHANNEL_CAPACITY) {
        match capacity.parse::<usize>() {
            Ok(n) => {
                config.channel_capacity = n;
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(value = %capacity, error = %e, "Ignoring {ENV_CHANNEL_CAPACITY}"),
        }
    }
    if let Some(path) = env(ENV_STORE_PATH) {
        config.store_path = Some(PathBuf::from(path));
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Default client id override
    pub default_client_id: Option<String>,

    /// Preferences file override
    pub store_path: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set default client id override
    #[must_use]
    pub fn with_default_client_id(mut self, client_id: String) -> Self {
        self.default_client_id = Some(client_id);
        self
    }

    /// Set preferences file override
    #[must_use]
    pub fn with_store_path(mut self, path: PathBuf) -> Self {
        self.store_path = Some(path);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut PanelConfig) {
        if self.default_client_id.is_some() || self.store_path.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref client_id) = self.default_client_id {
            config.default_client_id.clone_from(client_id);
        }

        if let Some(ref path) = self.store_path {
            config.store_path = Some(path.clone());
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
