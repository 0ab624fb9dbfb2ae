//! # Hookwork Configuration
//!
//! Serde-backed lifecycle settings. JSON is always available; YAML and TOML
//! are behind the `yaml-config` and `toml-config` features (both default).
//!
//! ```toml
//! start_timeout_ms = 5000
//! stop_timeout_ms = 30000
//! ```
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::kernel::constants::DEFAULT_TIMEOUT;
use crate::kernel::error::{Error, Result};

/// Supported configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

/// Start and stop budgets, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LifecycleConfig {
    #[serde(default = "default_timeout_ms")]
    pub start_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub stop_timeout_ms: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            start_timeout_ms: default_timeout_ms(),
            stop_timeout_ms: default_timeout_ms(),
        }
    }
}

impl LifecycleConfig {
    /// Parses and validates a configuration document.
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self> {
        let config: LifecycleConfig = match format {
            ConfigFormat::Json => serde_json::from_str(text)
                .map_err(|e| Error::Config(format!("JSON: {}", e)))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| Error::Config(format!("YAML: {}", e)))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(text)
                .map_err(|e| Error::Config(format!("TOML: {}", e)))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::Config(format!("unsupported config format: {}", path.display()))
        })?;
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&text, format)
    }

    /// Zero budgets would fail every pass before it begins.
    pub fn validate(&self) -> Result<()> {
        if self.start_timeout_ms == 0 {
            return Err(Error::Config("start_timeout_ms must be greater than zero".into()));
        }
        if self.stop_timeout_ms == 0 {
            return Err(Error::Config("stop_timeout_ms must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}
