//! Configuration resolution for `EVCharge`.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (`<config dir>/evcharge/settings.json`)
//! 3. Environment variables
//! 4. CLI arguments (applied by the caller, highest priority)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete `EVCharge` client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            hub: HubConfig::default(),
            storage: StorageConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// REST backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            connect_timeout_secs: 30,
            read_timeout_secs: 30,
            write_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Upper bound for a whole request: connect, send and receive.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .saturating_add(self.write_timeout_secs)
                .saturating_add(self.read_timeout_secs),
        )
    }
}

/// Realtime notification hub settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub url: String,
    pub enabled: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000/hubs/notifications".to_string(),
            enabled: true,
        }
    }
}

/// Local durable storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Per-installation data directory. `None` resolves to the platform
    /// data directory.
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolved data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.data_dir
            .clone()
            .or_else(default_data_dir)
            .ok_or_else(|| Error::Config("Cannot determine data directory".into()))
    }

    /// Path of the session key-value document.
    pub fn session_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("session.json"))
    }

    /// Path of the cache database.
    pub fn cache_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("cache.db"))
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            config = load_config_file(&global_path)?;
        }
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("evcharge").join("settings.json"))
}

/// Default per-installation data directory.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("evcharge"))
}

/// Read a settings file. Missing sections fall back to defaults.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

/// Apply `EVCHARGE_*` overrides read through `lookup`.
///
/// `EVCHARGE_TIMEOUT_SECS` sets all three timeouts at once.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("EVCHARGE_API_URL") {
        config.api.base_url = val;
    }
    if let Some(val) = lookup("EVCHARGE_HUB_URL") {
        config.hub.url = val;
    }
    if let Some(val) = lookup("EVCHARGE_DATA_DIR") {
        config.storage.data_dir = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("EVCHARGE_LOG_LEVEL") {
        config.log_level = val;
    }
    if let Some(secs) = lookup("EVCHARGE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.api.connect_timeout_secs = secs;
        config.api.read_timeout_secs = secs;
        config.api.write_timeout_secs = secs;
    }
}
