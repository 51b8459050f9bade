//! Configuration types for sift.
//!
//! Loaded from `~/.config/sift/config.toml` (or `$XDG_CONFIG_HOME`), with a
//! small set of environment overrides applied on top.

use crate::controller::ControllerConfig;
use crate::error::{Result, SiftError};
use serde::{Deserialize, Serialize};
use sift_client::ClientConfig;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "SIFT_BASE_URL";
/// Environment variable overriding [`ClientConfig::timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "SIFT_TIMEOUT_SECS";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Search service connection.
    pub client: ClientConfig,
    /// Controller behaviour.
    pub controller: ControllerConfig,
    /// Logging.
    pub log: LogConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is
    /// unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "sift=info,sift_client=info".to_owned(),
        }
    }
}

impl SiftConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SiftError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SiftError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` if it exists, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Returns the default config file path: `~/.config/sift/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("sift").join("config.toml")
        } else if let Some(config) = dirs::config_dir() {
            config.join("sift").join("config.toml")
        } else {
            PathBuf::from("/tmp/sift-config/config.toml")
        }
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::with_overrides_from`].
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Config`] if an override value does not parse.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.client.base_url = url.trim().to_owned();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.client.timeout_secs = raw.trim().parse().map_err(|e| {
                SiftError::Config(format!("{ENV_TIMEOUT_SECS}={raw:?} is not a number: {e}"))
            })?;
        }
        Ok(self)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.client
            .validate()
            .map_err(|e| SiftError::Config(e.to_string()))?;
        if self.log.filter.trim().is_empty() {
            return Err(SiftError::Config("log.filter must not be empty".into()));
        }
        Ok(())
    }
}
