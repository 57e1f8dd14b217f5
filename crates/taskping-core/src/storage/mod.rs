//! Local storage: TOML-based configuration.

mod config;

pub use config::{ApiConfig, Config, NotificationsConfig};

use std::path::PathBuf;

/// Returns `~/.config/taskping[-dev]/` based on TASKPING_ENV.
///
/// Set TASKPING_ENV=dev to use a separate development directory.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKPING_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("taskping-dev")
    } else {
        base_dir.join("taskping")
    }
}
