//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{
    default_butterfly_delay, default_pager_url, default_realname, default_relay_color,
    default_relay_config_path, default_shortener_endpoint, default_stream_open_timeout,
    default_stream_url, default_true, default_url_length, default_user_show_url,
    default_users_lookup_url,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identity, connection and behaviour of the chat bot.
    pub bot: BotConfig,
    /// URL shortening service.
    #[serde(default)]
    pub shortener: ShortenerConfig,
    /// Emergency pager page scanned by `!sikknel`.
    #[serde(default)]
    pub pager: PagerConfig,
    /// Optional live stream relay. Absent means the bridge commands are ignored.
    pub relay: Option<RelayConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// The relay section, if present and enabled.
    pub fn active_relay(&self) -> Option<&RelayConfig> {
        self.relay.as_ref().filter(|relay| relay.enabled)
    }
}

/// Chat bot identity and behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Nickname to register with; also the name commands are addressed to.
    pub nickname: String,
    /// Server address as `host:port`.
    pub server: String,
    /// Channel joined after registration and used for relay output.
    pub channel: String,
    /// Path of the JSON quote file.
    pub quotefile: String,
    /// Links longer than this are shortened.
    #[serde(default = "default_url_length")]
    pub url_length: usize,
    /// Give channel operator status to everyone who joins.
    #[serde(default)]
    pub auto_ops: bool,
    /// Log every inbound line.
    #[serde(default)]
    pub verbose: bool,
    /// Colour relayed lines.
    #[serde(default = "default_true")]
    pub colors: bool,
    /// Realname sent with USER.
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Delay before a `!butterfly` effect lands, in seconds.
    #[serde(default = "default_butterfly_delay")]
    pub butterfly_delay_secs: u64,
    /// Fixed RNG seed; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl BotConfig {
    pub fn butterfly_delay(&self) -> Duration {
        Duration::from_secs(self.butterfly_delay_secs)
    }
}

/// URL shortening service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortenerConfig {
    /// Endpoint queried as `GET <endpoint>?url=<link>`; the body is the short link.
    #[serde(default = "default_shortener_endpoint")]
    pub endpoint: String,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_shortener_endpoint(),
        }
    }
}

/// Emergency pager page configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PagerConfig {
    /// HTML page listing pager messages, newest first.
    #[serde(default = "default_pager_url")]
    pub url: String,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            url: default_pager_url(),
        }
    }
}

/// Stream relay configuration.
///
/// Credentials and the follow list live in a separate file (`config_path`)
/// because the relay rewrites it whenever the follow list changes.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path of the relay's own settings file.
    #[serde(default = "default_relay_config_path")]
    pub config_path: String,
    #[serde(default = "default_stream_url")]
    pub stream_url: String,
    /// How long to wait for the stream to answer, in seconds.
    #[serde(default = "default_stream_open_timeout")]
    pub open_timeout_secs: u64,
    #[serde(default = "default_user_show_url")]
    pub user_show_url: String,
    #[serde(default = "default_users_lookup_url")]
    pub users_lookup_url: String,
    /// mIRC colour number for relayed lines.
    #[serde(default = "default_relay_color")]
    pub color: u8,
}

impl RelayConfig {
    pub fn open_timeout(&self) -> Duration {
        Duration::from_secs(self.open_timeout_secs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            config_path: default_relay_config_path(),
            stream_url: default_stream_url(),
            open_timeout_secs: default_stream_open_timeout(),
            user_show_url: default_user_show_url(),
            users_lookup_url: default_users_lookup_url(),
            color: default_relay_color(),
        }
    }
}
