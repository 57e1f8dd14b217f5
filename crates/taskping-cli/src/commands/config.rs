//! Configuration management commands.

use clap::Subcommand;
use taskping_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Set the task API base URL
    SetUrl {
        /// Base URL, e.g. http://localhost:8000
        base_url: String,
    },
    /// Set (or clear, when omitted) the API bearer token
    SetToken {
        token: Option<String>,
    },
    /// Enable or disable reminder notifications
    Notifications {
        /// "on" or "off"
        state: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }
        ConfigAction::SetUrl { base_url } => {
            let mut config = Config::load()?;
            config.api.base_url = base_url;
            config.save()?;
            println!("base URL updated");
        }
        ConfigAction::SetToken { token } => {
            let mut config = Config::load()?;
            let cleared = token.is_none();
            config.api.token = token;
            config.save()?;
            println!("token {}", if cleared { "cleared" } else { "updated" });
        }
        ConfigAction::Notifications { state } => {
            let enabled = match state.as_str() {
                "on" => true,
                "off" => false,
                other => return Err(format!("expected 'on' or 'off', got '{other}'").into()),
            };
            let mut config = Config::load()?;
            config.notifications.enabled = enabled;
            config.save()?;
            println!("notifications {state}");
        }
    }

    Ok(())
}
