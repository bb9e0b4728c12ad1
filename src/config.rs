//! Configuration management for NoticePush
//!
//! This module defines the `Config` struct holding all settings for the
//! notification channel. It uses the `figment` crate to load configuration
//! from a TOML file and merge it with environment variables.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// The main configuration struct for the channel.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Settings for the ServerChan notification channel.
    pub notifier: NotifierConfig,
}

/// Settings for the ServerChan notification channel.
///
/// Replaced wholesale whenever the host supplies new settings; never
/// mutated field-by-field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotifierConfig {
    /// Whether the channel forwards events at all.
    #[serde(default)]
    pub enabled: bool,
    /// The ServerChan send key identifying the destination push channel.
    #[serde(default)]
    pub send_key: String,
    /// Free-text label attached to outbound messages.
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Allow-list of message type names; empty means allow all.
    #[serde(default)]
    pub msg_types: Vec<String>,
}

fn default_tag() -> String {
    "MOVIE PILOT".to_string()
}

impl Config {
    /// Loads the configuration from the specified file.
    ///
    /// Sources are layered: built-in defaults, then the TOML file, then
    /// environment variables (e.g. `NOTICEPUSH_NOTIFIER__SEND_KEY=...`).
    pub fn load(config_path: &str) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("NOTICEPUSH_").split("__"))
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            send_key: String::new(),
            tag: default_tag(),
            msg_types: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.notifier.enabled);
        assert!(config.notifier.send_key.is_empty());
        assert_eq!(config.notifier.tag, "MOVIE PILOT");
        assert!(config.notifier.msg_types.is_empty());
    }
}
