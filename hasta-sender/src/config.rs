//! Configuration for the hasta sender
//!
//! Loaded from a TOML file. Every field has a default, so an empty file (or
//! no file at all) gives a sender that streams to `127.0.0.1:1999` at 60Hz.
//!
//! ```toml
//! [network]
//! destination = "10.0.0.37:1999"
//! bind_address = "0.0.0.0:0"
//!
//! [publisher]
//! tick_hz = 60.0
//!
//! [offsets]
//! step = 0.1
//! file = "offsets.toml"
//!
//! [simulation]
//! random_seed = 42
//!
//! [logging]
//! level = "info"
//! ```

use crate::error::Result;
use hasta_wire::{DEFAULT_HOST, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level sender configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SenderConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub offsets: OffsetConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where datagrams go
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Receiver address (`host:port`)
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Local bind address; port 0 picks any free port
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Send loop settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublisherConfig {
    /// Datagrams per second (one per display frame)
    #[serde(default = "default_tick_hz")]
    pub tick_hz: f32,
}

/// Calibration offset settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OffsetConfig {
    /// Distance one nudge command moves an axis
    #[serde(default = "default_offset_step")]
    pub step: f32,

    /// Where offsets persist between runs (not persisted when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Simulated tracker settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// 0 = random each run
    #[serde(default)]
    pub random_seed: u64,

    /// Position jitter standard deviation
    #[serde(default = "default_jitter_stddev")]
    pub jitter_stddev: f32,

    /// Radius of the circle each hand traces
    #[serde(default = "default_orbit_radius")]
    pub orbit_radius: f32,

    /// Seconds per orbit
    #[serde(default = "default_orbit_period")]
    pub orbit_period_secs: f32,

    /// Seconds per visibility cycle (both, left only, none, right only)
    #[serde(default = "default_visibility_cycle")]
    pub visibility_cycle_secs: f32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_destination() -> String {
    format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT)
}

fn default_bind_address() -> String {
    "0.0.0.0:0".to_string()
}

fn default_tick_hz() -> f32 {
    60.0
}

fn default_offset_step() -> f32 {
    0.1
}

fn default_jitter_stddev() -> f32 {
    0.002
}

fn default_orbit_radius() -> f32 {
    0.05
}

fn default_orbit_period() -> f32 {
    4.0
}

fn default_visibility_cycle() -> f32 {
    20.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            bind_address: default_bind_address(),
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
        }
    }
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            step: default_offset_step(),
            file: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            random_seed: 0,
            jitter_stddev: default_jitter_stddev(),
            orbit_radius: default_orbit_radius(),
            orbit_period_secs: default_orbit_period(),
            visibility_cycle_secs: default_visibility_cycle(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SenderConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: SenderConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
