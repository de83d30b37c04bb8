//! Configuration for trafficlens.
//!
//! Layered with figment: built-in defaults, then a TOML file, then
//! `TRAFFICLENS_`-prefixed environment variables (`__` separates nested
//! keys, e.g. `TRAFFICLENS_SERVER__URL`). The result is validated and
//! translated into `trafficlens_core::DashboardConfig` and
//! `trafficlens_api::ChannelConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use trafficlens_api::{ChannelConfig, ReconnectConfig};
use trafficlens_core::DashboardConfig;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TRAFFICLENS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where the detection server lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server base URL (e.g., "http://localhost:5000").
    #[serde(default = "default_url")]
    pub url: String,

    /// Seconds allowed for the WebSocket upgrade plus namespace connect.
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout_secs: u64,

    #[serde(default)]
    pub reconnect: ReconnectSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            handshake_timeout_secs: default_handshake_timeout(),
            reconnect: ReconnectSettings::default(),
        }
    }
}

/// Reconnection policy. Off unless enabled explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReconnectSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Unlimited when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            max_retries: None,
        }
    }
}

/// Display limits and terminal timings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_traffic_capacity")]
    pub traffic_capacity: usize,

    #[serde(default = "default_chart_points")]
    pub chart_points: usize,

    #[serde(default = "default_alert_duration")]
    pub alert_duration_secs: u64,

    /// Terminal input poll interval.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Redraw interval.
    #[serde(default = "default_frame_rate")]
    pub frame_rate_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            traffic_capacity: default_traffic_capacity(),
            chart_points: default_chart_points(),
            alert_duration_secs: default_alert_duration(),
            tick_rate_ms: default_tick_rate(),
            frame_rate_ms: default_frame_rate(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:5000".into()
}
fn default_handshake_timeout() -> u64 {
    10
}
fn default_initial_delay() -> u64 {
    1_000
}
fn default_max_delay() -> u64 {
    30_000
}
fn default_traffic_capacity() -> usize {
    trafficlens_core::config::DEFAULT_TRAFFIC_CAPACITY
}
fn default_chart_points() -> usize {
    trafficlens_core::config::DEFAULT_CHART_POINTS
}
fn default_alert_duration() -> u64 {
    trafficlens_core::config::DEFAULT_ALERT_DURATION.as_secs()
}
fn default_tick_rate() -> u64 {
    250
}
fn default_frame_rate() -> u64 {
    33
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "trafficlens", "trafficlens").map_or_else(
        || PathBuf::from(".trafficlens.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load and validate the config from `path` + environment.
///
/// A missing file is not an error; defaults and env still apply.
/// `server_url` (the command-line override) wins over every layer and is
/// applied before validation.
pub fn load_config(path: &Path, server_url: Option<&str>) -> Result<Config, ConfigError> {
    let mut figment = figment_for(path);
    if let Some(url) = server_url {
        figment = figment.merge(Serialized::default("server.url", url));
    }
    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

// ── Validation & translation ────────────────────────────────────────

impl Config {
    /// Check every field the runtime relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server_url()?;

        if self.server.handshake_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "server.handshake_timeout_secs",
                "must be at least 1",
            ));
        }
        let reconnect = &self.server.reconnect;
        if reconnect.max_delay_ms < reconnect.initial_delay_ms {
            return Err(ConfigError::invalid(
                "server.reconnect.max_delay_ms",
                "must not be below initial_delay_ms",
            ));
        }

        for (field, value) in [
            ("display.traffic_capacity", self.display.traffic_capacity),
            ("display.chart_points", self.display.chart_points),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        for (field, value) in [
            ("display.alert_duration_secs", self.display.alert_duration_secs),
            ("display.tick_rate_ms", self.display.tick_rate_ms),
            ("display.frame_rate_ms", self.display.frame_rate_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        Ok(())
    }

    /// The parsed server URL. Only http, https, ws and wss are accepted.
    pub fn server_url(&self) -> Result<Url, ConfigError> {
        let url: Url = self
            .server
            .url
            .parse()
            .map_err(|e| ConfigError::invalid("server.url", format!("{e}: {}", self.server.url)))?;
        match url.scheme() {
            "http" | "https" | "ws" | "wss" => Ok(url),
            other => Err(ConfigError::invalid(
                "server.url",
                format!("unsupported scheme '{other}'"),
            )),
        }
    }

    pub fn to_dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            traffic_capacity: self.display.traffic_capacity,
            chart_points: self.display.chart_points,
            alert_duration: Duration::from_secs(self.display.alert_duration_secs),
        }
    }

    pub fn to_channel_config(&self) -> Result<ChannelConfig, ConfigError> {
        let url = self.server_url()?;
        let mut channel = ChannelConfig::new(&url)
            .map_err(|e| ConfigError::invalid("server.url", e.to_string()))?;
        channel.handshake_timeout = Duration::from_secs(self.server.handshake_timeout_secs);

        let reconnect = &self.server.reconnect;
        channel.reconnect = ReconnectConfig {
            enabled: reconnect.enabled,
            initial_delay: Duration::from_millis(reconnect.initial_delay_ms),
            max_delay: Duration::from_millis(reconnect.max_delay_ms),
            max_retries: reconnect.max_retries,
        };
        Ok(channel)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.display.tick_rate_ms)
    }

    pub fn frame_rate(&self) -> Duration {
        Duration::from_millis(self.display.frame_rate_ms)
    }

    /// Pretty TOML, as accepted by [`load_config`].
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.url, "http://localhost:5000");
        assert!(!config.server.reconnect.enabled);
        assert_eq!(config.to_dashboard_config(), DashboardConfig::default());
    }

    #[test]
    fn channel_config_translation() {
        let mut config = Config::default();
        config.server.reconnect.enabled = true;
        config.server.reconnect.max_retries = Some(4);

        let channel = config.to_channel_config().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            channel.endpoint.as_str(),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(channel.handshake_timeout, Duration::from_secs(10));
        assert!(channel.reconnect.enabled);
        assert_eq!(channel.reconnect.initial_delay, Duration::from_secs(1));
        assert_eq!(channel.reconnect.max_retries, Some(4));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        config.server.url = "ftp://localhost".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field, .. }) if field == "server.url"
        ));

        let mut config = Config::default();
        config.display.traffic_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { field, .. }) if field == "display.traffic_capacity"
        ));

        let mut config = Config::default();
        config.display.alert_duration_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_output_omits_unset_retry_limit() {
        let text = Config::default().to_toml().unwrap_or_default();
        assert!(text.contains("[server]"));
        assert!(text.contains("url = \"http://localhost:5000\""));
        assert!(text.contains("[display]"));
        assert!(!text.contains("max_retries"));
    }
}
