//! TOML Configuration File Support
//!
//! Centralized configuration loading for the concierge, from a TOML file at
//! `~/.config/concierge/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! offline = false
//!
//! [provider]
//! api_key = "..."
//! model = "gemini-2.0-flash"
//! timeout_secs = 30
//! repeat_persona = true
//!
//! [persona]
//! name = "Arpit's Digital Twin"
//!
//! [idle]
//! interval_ms = 8000
//! probability = 0.3
//! visible_ms = 5000
//!
//! [session]
//! greeting_delay_ms = 500
//! max_message_bytes = 4096
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::ProviderConfig;
use crate::idle::IdleConfig;
use crate::persona::Persona;
use crate::security::InputLimits;

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

/// Where the highest-priority configuration value came from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    #[default]
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
// Configuration Structures
// =============================================================================

/// Session timing and limits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay between an open signal and its greeting turn, in milliseconds
    pub greeting_delay_ms: u64,
    /// Maximum size of a submitted message in bytes
    pub max_message_bytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting_delay_ms: 500,
            max_message_bytes: InputLimits::default().max_message_bytes,
        }
    }
}

impl SessionConfig {
    /// Delay between an open signal and its greeting turn
    #[must_use]
    pub fn greeting_delay(&self) -> Duration {
        Duration::from_millis(self.greeting_delay_ms)
    }

    /// Input limits for submitted messages
    #[must_use]
    pub fn input_limits(&self) -> InputLimits {
        InputLimits {
            max_message_bytes: self.max_message_bytes,
        }
    }
}

/// Complete concierge configuration
///
/// Every section is optional in the file; missing keys keep their defaults.
/// Use [`load_config`] to load with proper priority handling.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConciergeConfig {
    /// Use the offline scripted provider even if an API key is present
    pub offline: bool,
    /// Generation API settings
    pub provider: ProviderConfig,
    /// Persona texts
    pub persona: Persona,
    /// Idle prompt settings
    pub idle: IdleConfig,
    /// Session timing and limits
    pub session: SessionConfig,

    /// Path to the config file that was loaded (if any)
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    #[serde(skip)]
    source: ConfigSource,
}

impl ConciergeConfig {
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

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Whether the scripted provider should answer instead of the network
    #[must_use]
    pub fn use_scripted_provider(&self) -> bool {
        self.offline || !self.provider.has_api_key()
    }

    /// Reject values that cannot drive a session
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.idle.probability) {
            return Err(ConfigError::ValidationError(format!(
                "idle.probability must be between 0 and 1, got {}",
                self.idle.probability
            )));
        }
        if self.idle.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "idle.interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.session.max_message_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "session.max_message_bytes must be greater than 0".to_string(),
            ));
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.model must not be empty".to_string(),
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
/// Returns `$XDG_CONFIG_HOME/concierge/config.toml` or the platform
/// equivalent.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("concierge").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed or holds
/// invalid values. A missing config file is not an error.
pub fn load_config() -> Result<ConciergeConfig, ConfigError> {
    load_config_from_path(default_config_path().as_deref())
}

/// Load configuration from a specific path
///
/// If `path` is `None`, only defaults and environment variables are used.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds invalid
/// values.
pub fn load_config_from_path(path: Option<&Path>) -> Result<ConciergeConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ConciergeConfig, ConfigError> {
    let mut config = match path {
        Some(config_path) if config_path.exists() => {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;

            let mut config: ConciergeConfig = toml::from_str(&toml_content)?;
            config.config_file_path = Some(config_path.to_path_buf());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
            config
        }
        Some(config_path) => {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
            ConciergeConfig::default()
        }
        None => ConciergeConfig::default(),
    };

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply environment variable overrides to the config
///
/// Environment variables:
/// - `CONCIERGE_API_KEY` (or `GEMINI_API_KEY`): API key
/// - `CONCIERGE_MODEL`: model identifier
/// - `CONCIERGE_BASE_URL`: API base URL
/// - `CONCIERGE_TIMEOUT_SECS`: request deadline in seconds
/// - `CONCIERGE_OFFLINE`: "1" or "true" to use the scripted provider
fn apply_env_config(config: &mut ConciergeConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(key) = env("CONCIERGE_API_KEY").or_else(|| env("GEMINI_API_KEY")) {
        config.provider.api_key = Some(key);
        config.source = ConfigSource::Env;
    }
    if let Some(model) = env("CONCIERGE_MODEL") {
        config.provider.model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(url) = env("CONCIERGE_BASE_URL") {
        config.provider.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("CONCIERGE_TIMEOUT_SECS") {
        match timeout.parse::<u64>() {
            Ok(secs) => {
                config.provider.timeout_secs = secs;
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(value = %timeout, "Ignoring unparseable CONCIERGE_TIMEOUT_SECS");
            }
        }
    }
    if let Some(offline) = env("CONCIERGE_OFFLINE") {
        config.offline = offline == "1" || offline.to_lowercase() == "true";
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
    /// Force the scripted provider
    pub offline: Option<bool>,

    /// Model override
    pub model: Option<String>,

    /// Request deadline override (seconds)
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set offline override
    #[must_use]
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = Some(offline);
        self
    }

    /// Set model override
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    /// Set request deadline override
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut ConciergeConfig) {
        if self.offline.is_some() || self.model.is_some() || self.timeout_secs.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(offline) = self.offline {
            config.offline = offline;
        }

        if let Some(ref model) = self.model {
            config.provider.model = model.clone();
        }

        if let Some(secs) = self.timeout_secs {
            config.provider.timeout_secs = secs;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
