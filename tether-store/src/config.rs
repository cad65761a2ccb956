//! Configuration management.
//!
//! The config file is JSON. Every section and field is optional; anything
//! missing takes its default, and a missing file is the all-defaults config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tether_fetch::{DEFAULT_BASE_URL, WindowSize};
use tracing::{debug, info};
use url::Url;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/tether`
/// - Linux: `~/.config/tether`
/// - Windows: `%APPDATA%\tether`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join("tether"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Config Sections
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Integration backend settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Authorization window settings.
    #[serde(default)]
    pub window: WindowConfig,
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Integration backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Authorization window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window width in pixels.
    #[serde(default = "default_window_dimension")]
    pub width: u32,
    /// Window height in pixels.
    #[serde(default = "default_window_dimension")]
    pub height: u32,
    /// How often to check whether the window was closed, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Browser executable to use instead of searching `PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<PathBuf>,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when no verbosity flag is given.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_window_dimension() -> u32 {
    600
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_dimension(),
            height: default_window_dimension(),
            poll_interval_ms: default_poll_interval_ms(),
            browser: None,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WindowConfig {
    /// Window size for the authorization window.
    pub fn size(&self) -> WindowSize {
        WindowSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Window poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ============================================================================
// Load / Save
// ============================================================================

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.json")
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults. The loaded config is validated.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), StoreError> {
        let url = Url::parse(&self.backend.base_url).map_err(|e| {
            StoreError::Config(format!(
                "backend.base_url '{}' is not a valid URL: {e}",
                self.backend.base_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StoreError::Config(format!(
                "backend.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(StoreError::Config(
                "backend.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.window.poll_interval_ms == 0 {
            return Err(StoreError::Config(
                "window.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(StoreError::Config(
                "window.width and window.height must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
