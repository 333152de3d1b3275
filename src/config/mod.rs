//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

/// Client configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// WebSocket endpoint of the world server
    pub server_url: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log line format on stderr
    pub log_format: LogFormat,
    /// Display name sent with the join request
    pub player_name: String,

    /// World size in world units
    pub world_width: f64,
    pub world_height: f64,

    /// Initial drawing surface size in pixels
    pub viewport_width: f64,
    pub viewport_height: f64,

    /// Background map image (URL or local path); empty disables the map
    pub map_url: Option<String>,
    /// Logical draw width of every avatar sprite
    pub avatar_width: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:8080/ws".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            player_name: "Player".to_string(),
            world_width: 2048.0,
            world_height: 2048.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            map_url: Some("assets/map.png".to_string()),
            avatar_width: 32.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let map_url = match lookup("MAP_URL") {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => Some(url),
            None => defaults.map_url,
        };

        let config = Self {
            server_url: lookup("SERVER_URL").unwrap_or(defaults.server_url),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format)?,
            player_name: lookup("PLAYER_NAME").unwrap_or(defaults.player_name),
            world_width: parse_or(&lookup, "WORLD_WIDTH", defaults.world_width)?,
            world_height: parse_or(&lookup, "WORLD_HEIGHT", defaults.world_height)?,
            viewport_width: parse_or(&lookup, "VIEWPORT_WIDTH", defaults.viewport_width)?,
            viewport_height: parse_or(&lookup, "VIEWPORT_HEIGHT", defaults.viewport_height)?,
            map_url,
            avatar_width: parse_or(&lookup, "AVATAR_WIDTH", defaults.avatar_width)?,
        };

        if !config.server_url.starts_with("ws://") && !config.server_url.starts_with("wss://") {
            return Err(ConfigError::InvalidUrl(config.server_url));
        }
        for (name, value) in [
            ("WORLD_WIDTH", config.world_width),
            ("WORLD_HEIGHT", config.world_height),
            ("VIEWPORT_WIDTH", config.viewport_width),
            ("VIEWPORT_HEIGHT", config.viewport_height),
            ("AVATAR_WIDTH", config.avatar_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    name,
                    value: value.to_string(),
                });
            }
        }

        Ok(config)
    }
}

/// Output format for log lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Server URL must use ws:// or wss://, got {0}")]
    InvalidUrl(String),
}
