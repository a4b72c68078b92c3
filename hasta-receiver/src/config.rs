//! Configuration for the hasta receiver
//!
//! ```toml
//! [network]
//! bind_address = "0.0.0.0:1999"
//! read_timeout_ms = 100
//!
//! [consumer]
//! tick_hz = 60.0
//!
//! [logging]
//! level = "info"
//! stats_interval_secs = 10
//! ```

use crate::error::Result;
use hasta_wire::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level receiver configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReceiverConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Socket settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Local address to receive on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// How long one recv may block before the loop rechecks for shutdown
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

/// Consumer tick settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsumerConfig {
    /// Reconciliation ticks per second
    #[serde(default = "default_tick_hz")]
    pub tick_hz: f32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Seconds between stats lines (0 = only at shutdown)
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,
}

fn default_bind_address() -> String {
    format!("0.0.0.0:{}", DEFAULT_PORT)
}

fn default_read_timeout_ms() -> u64 {
    100
}

fn default_tick_hz() -> f32 {
    60.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_stats_interval() -> u64 {
    10
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stats_interval_secs: default_stats_interval(),
        }
    }
}

impl ReceiverConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ReceiverConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReceiverConfig::default();
        assert_eq!(config.network.bind_address, "0.0.0.0:1999");
        assert_eq!(config.network.read_timeout_ms, 100);
        assert_eq!(config.consumer.tick_hz, 60.0);
        assert_eq!(config.logging.stats_interval_secs, 10);
    }

    #[test]
    fn test_partial_file() {
        let config: ReceiverConfig = toml::from_str(
            r#"
[network]
bind_address = "127.0.0.1:2001"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.network.bind_address, "127.0.0.1:2001");
        assert_eq!(config.network.read_timeout_ms, 100);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.consumer.tick_hz, 60.0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receiver.toml");

        let mut config = ReceiverConfig::default();
        config.consumer.tick_hz = 90.0;
        config.to_file(&path).unwrap();

        let loaded = ReceiverConfig::from_file(&path).unwrap();
        assert_eq!(loaded.consumer.tick_hz, 90.0);
        assert_eq!(loaded.network.bind_address, "0.0.0.0:1999");
    }
}
