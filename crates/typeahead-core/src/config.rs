//! Configuration types.
//!
//! Configuration lives in `config.toml` under the typeahead config directory.
//! Every field has a default, so a missing file (or a missing key) is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Runtime configuration for the widget and its pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Query Source throttle window in milliseconds.
    pub throttle_ms: u64,

    /// Additional provider attempts after the first failure.
    pub max_retries: u32,

    /// Maximum number of results requested from the provider.
    pub result_limit: u32,

    /// Text of the row shown when there is nothing to display.
    pub placeholder: String,

    /// Remote provider settings
    pub provider: ProviderConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 20,
            max_retries: 3,
            result_limit: 5,
            placeholder: "No results to display...".to_string(),
            provider: ProviderConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Throttle window as a duration.
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Load from the default location (`<config_dir>/typeahead/config.toml`).
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.throttle_ms == 0 {
            return Err(ConfigError::Invalid("throttle_ms must be > 0".to_string()));
        }
        if self.result_limit == 0 {
            return Err(ConfigError::Invalid("result_limit must be > 0".to_string()));
        }
        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remote search provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// OpenSearch API endpoint.
    pub endpoint: String,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Transport timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
            user_agent: concat!("typeahead/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("typeahead"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> std::io::Result<()> {
    if let Some(dir) = config_dir() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
