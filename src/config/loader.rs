//! Configuration loader for live-map-core
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use crate::controller::ControllerSettings;
use crate::core::types::{AddressSpec, BridgeResult};
use crate::tracking::{Calibration, TrackingConfig};
use crate::transport::{SessionOptions, Throttle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_connection")]
    pub connection: ConnectionConfig,

    #[serde(default = "default_throttle")]
    pub throttle: ThrottleConfig,

    #[serde(default = "default_tracking")]
    pub tracking: TrackingSection,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Debug bridge endpoint and socket timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_receive_timeout_ms")]
    pub receive_timeout_ms: u64,
    #[serde(default = "default_close_grace_ms")]
    pub close_grace_ms: u64,
}

/// Flow control between request and reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_bytes_per_second")]
    pub bytes_per_second: u32,
}

/// Position tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Main-relative offset of the position; ignored when `position_pointer` is set
    #[serde(default = "default_position_address")]
    pub position_address: u64,
    /// Pointer chain to the position, e.g. `[[main+0x42D6110]+0x10]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_pointer: Option<String>,
    #[serde(default = "default_calibration")]
    pub calibration: Calibration,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Config {
    /// Session tunables as plain values
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            connect_timeout: Duration::from_millis(self.connection.connect_timeout_ms),
            receive_timeout: Duration::from_millis(self.connection.receive_timeout_ms),
            close_grace: Duration::from_millis(self.connection.close_grace_ms),
            throttle: Throttle::new(self.throttle.bytes_per_second),
        }
    }

    /// Tracking settings as plain values; fails on a malformed pointer chain
    pub fn tracking_config(&self) -> BridgeResult<TrackingConfig> {
        let address = match &self.tracking.position_pointer {
            Some(chain) => AddressSpec::pointer(chain)?,
            None => AddressSpec::main(self.tracking.position_address),
        };
        Ok(TrackingConfig {
            interval: Duration::from_millis(self.tracking.interval_ms),
            address,
            calibration: self.tracking.calibration,
        })
    }

    /// Everything the controller needs
    pub fn controller_settings(&self) -> BridgeResult<ControllerSettings> {
        Ok(ControllerSettings {
            host: self.connection.host.clone(),
            port: self.connection.port,
            session: self.session_options(),
            tracking: self.tracking_config()?,
        })
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is missing
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "live-map.toml";

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default()
}

// Default functions for serde
fn default_connection() -> ConnectionConfig {
    let defaults = default_config().connection;
    ConnectionConfig {
        host: defaults.host,
        port: defaults.port,
        connect_timeout_ms: defaults.connect_timeout_ms,
        receive_timeout_ms: defaults.receive_timeout_ms,
        close_grace_ms: defaults.close_grace_ms,
    }
}

fn default_throttle() -> ThrottleConfig {
    ThrottleConfig {
        bytes_per_second: default_bytes_per_second(),
    }
}

fn default_tracking() -> TrackingSection {
    TrackingSection {
        interval_ms: default_interval_ms(),
        position_address: default_position_address(),
        position_pointer: None,
        calibration: default_calibration(),
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
    }
}

// Individual field defaults
fn default_host() -> String {
    default_config().connection.host
}

fn default_port() -> u16 {
    default_config().connection.port
}

fn default_connect_timeout_ms() -> u64 {
    default_config().connection.connect_timeout_ms
}

fn default_receive_timeout_ms() -> u64 {
    default_config().connection.receive_timeout_ms
}

fn default_close_grace_ms() -> u64 {
    default_config().connection.close_grace_ms
}

fn default_bytes_per_second() -> u32 {
    default_config().throttle.bytes_per_second
}

fn default_interval_ms() -> u64 {
    default_config().tracking.interval_ms
}

fn default_position_address() -> u64 {
    default_config().tracking.position_address
}

fn default_calibration() -> Calibration {
    let tracking = default_config().tracking;
    Calibration {
        offset_x: tracking.offset_x,
        offset_z: tracking.offset_z,
        scale: tracking.scale,
        zoom: tracking.zoom,
    }
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            connection: default_connection(),
            throttle: default_throttle(),
            tracking: default_tracking(),
            logging: default_logging(),
        }
    }
}
