//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file
//! (`data/config.yaml`). Defines the structs for service credentials and
//! system settings.

use serde::Deserialize;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

/// Configuration for the connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    pub gitlab: GitLabConfig,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Bot token. Falls back to the TELEGRAM_TOKEN environment variable.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GitLabConfig {
    /// Instance base URL, e.g. `https://gitlab.com`.
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_minutes: u64,
    /// Commit messages and issue descriptions are truncated to this many
    /// characters before delivery.
    #[serde(default = "default_description_limit")]
    pub description_limit: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            poll_interval_minutes: default_poll_interval(),
            description_limit: default_description_limit(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    15
}

fn default_description_limit() -> usize {
    150
}

impl AppConfig {
    /// Telegram token from the config file, or the environment as a fallback.
    pub fn telegram_token(&self) -> Option<String> {
        self.services
            .telegram
            .token
            .clone()
            .or_else(|| std::env::var("TELEGRAM_TOKEN").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let yaml = r#"
services:
  telegram:
    token: "123:abc"
  gitlab:
    base_url: "https://gitlab.example.com"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.services.telegram.token.as_deref(), Some("123:abc"));
        assert_eq!(config.services.gitlab.base_url, "https://gitlab.example.com");
        assert_eq!(config.system.poll_interval_minutes, 15);
        assert_eq!(config.system.description_limit, 150);
        assert_eq!(config.services.gitlab.timeout_secs, 30);
    }

    #[test]
    fn parses_overridden_system_settings() {
        let yaml = r#"
services:
  gitlab:
    base_url: "https://gitlab.example.com"
    timeout_secs: 10
system:
  poll_interval_minutes: 5
  description_limit: 80
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.system.poll_interval_minutes, 5);
        assert_eq!(config.system.description_limit, 80);
        assert_eq!(config.services.gitlab.timeout_secs, 10);
        assert!(config.services.telegram.token.is_none());
    }
}
