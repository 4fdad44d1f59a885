//! Runtime configuration.
//!
//! Every field has a default, so an empty or missing config file is valid.
//! The CLI layers flag and environment overrides on top of what is loaded here.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{HeraldError, HeraldResult};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default per-connection outbound queue bound.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default socket write timeout in milliseconds.
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    pub server: ServerConfig,
    pub hub: HubConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Socket address string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Push hub settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Live notifications buffered per connection before it is dropped.
    pub queue_capacity: usize,
    /// How long a single socket write may take before the connection is dropped.
    pub write_timeout_ms: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
        }
    }
}

impl HubConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl HeraldConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> HeraldResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> HeraldResult<Self> {
        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading config file");
                let text = std::fs::read_to_string(path)?;
                Self::from_toml(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Reject values the hub cannot run with.
    pub fn validate(&self) -> HeraldResult<()> {
        if self.hub.queue_capacity == 0 {
            return Err(HeraldError::config("hub.queue_capacity must be greater than 0"));
        }
        if self.hub.write_timeout_ms == 0 {
            return Err(HeraldError::config("hub.write_timeout_ms must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HeraldConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.hub.queue_capacity, 64);
        assert_eq!(config.hub.write_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = HeraldConfig::from_toml("").unwrap();
        assert_eq!(config, HeraldConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let text = "[server]\nport = 9000\n\n[hub]\nqueue_capacity = 8\n";
        let config = HeraldConfig::from_toml(text).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.hub.queue_capacity, 8);
        assert_eq!(config.hub.write_timeout_ms, 5_000);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = HeraldConfig::from_toml("[hub]\nqueue_capacity = 0\n").unwrap_err();
        assert!(matches!(err, HeraldError::Config(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = HeraldConfig::from_toml("[server]\nport = \"nope\"\n").unwrap_err();
        assert!(matches!(err, HeraldError::Toml(_)));
    }

    #[test]
    fn test_load_without_path() {
        let config = HeraldConfig::load(None).unwrap();
        assert_eq!(config, HeraldConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = HeraldConfig::load(Some(Path::new("/nonexistent/herald.toml"))).unwrap_err();
        assert!(matches!(err, HeraldError::Io(_)));
    }
}
