//! TOML-based application configuration.
//!
//! Stores:
//! - Task API connection settings (base URL, bearer token)
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/taskping/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::config_dir;
use crate::error::ConfigError;

/// Task API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for the task API, when the deployment requires auth.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
        }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/taskping/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the default path; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        toml::from_str(&raw).map_err(|err| ConfigError::ParseFailed(err.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |err: std::io::Error| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(save_failed)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|err| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        std::fs::write(path, raw).map_err(save_failed)
    }
}
