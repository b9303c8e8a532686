//! Configuration for citekit
//!
//! Loaded from `config.toml` in the platform config directory when present,
//! otherwise defaults. `CITEKIT_API_BASE` and `CITEKIT_DATA_DIR` override the
//! file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::formatter::CitationStyle;
use crate::normalize::HISTORY_MAX_AUTHORS;
use crate::sources::CrossrefSource;

/// Directory name under the platform config/data dirs
pub const APP_DIR: &str = "citekit";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitekitConfig {
    /// Metadata API settings
    pub api: ApiConfig,
    /// History persistence settings
    pub history: HistoryConfig,
    /// Copy acknowledgment settings
    pub clipboard: ClipboardConfig,
    /// History author limit and default style
    pub display: DisplayConfig,
}

/// Metadata API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Contact address for the Crossref polite pool
    pub mailto: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: CrossrefSource::metadata().base_url.to_string(),
            user_agent: format!("citekit/{}", env!("CARGO_PKG_VERSION")),
            mailto: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// User agent with the mailto suffix when configured
    pub fn effective_user_agent(&self) -> String {
        match self.mailto.as_deref().filter(|m| !m.is_empty()) {
            Some(mailto) => format!("{} (mailto:{})", self.user_agent, mailto),
            None => self.user_agent.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// History configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_items: usize,
    pub storage_key: String,
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_items: 20,
            storage_key: "citationHistory".to_string(),
            data_dir: None,
        }
    }
}

impl HistoryConfig {
    /// Configured directory, else `<data dir>/citekit`
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
    }
}

/// Clipboard acknowledgment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    pub ack_window_ms: u64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            ack_window_ms: 3000,
        }
    }
}

impl ClipboardConfig {
    pub fn ack_window(&self) -> Duration {
        Duration::from_millis(self.ack_window_ms)
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub history_max_authors: usize,
    pub default_style: CitationStyle,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            history_max_authors: HISTORY_MAX_AUTHORS,
            default_style: CitationStyle::Apa,
        }
    }
}

impl CitekitConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load `<config dir>/citekit/config.toml` if it exists, else defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path().filter(|p| p.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config");
                Self::load(&path)
            }
            None => {
                let mut config = Self::default();
                config.apply_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Apply `CITEKIT_API_BASE` / `CITEKIT_DATA_DIR` overrides
    pub fn apply_env(&mut self) {
        if let Ok(base) = std::env::var("CITEKIT_API_BASE") {
            if !base.is_empty() {
                self.api.base_url = base;
            }
        }
        if let Ok(dir) = std::env::var("CITEKIT_DATA_DIR") {
            if !dir.is_empty() {
                self.history.data_dir = Some(PathBuf::from(dir));
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Invalid(format!("api.base_url {:?}: {}", self.api.base_url, e))
        })?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be positive".to_string(),
            ));
        }

        if self.history.max_items == 0 {
            return Err(ConfigError::Invalid(
                "history.max_items must be at least 1".to_string(),
            ));
        }

        if self.history.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "history.storage_key must not be empty".to_string(),
            ));
        }

        if self.clipboard.ack_window_ms == 0 {
            return Err(ConfigError::Invalid(
                "clipboard.ack_window_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
