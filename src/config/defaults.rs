//! Default configuration values for live-map-core

use crate::tracking::transform::{DEFAULT_OFFSET_X, DEFAULT_OFFSET_Z, DEFAULT_SCALE, DEFAULT_ZOOM};
use crate::tracking::{DEFAULT_INTERVAL, DEFAULT_POSITION_ADDRESS};
use crate::transport::{
    DEFAULT_BYTES_PER_SECOND, DEFAULT_CLOSE_GRACE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT,
    DEFAULT_RECEIVE_TIMEOUT,
};
use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub connection: ConnectionDefaults,
    pub throttle: ThrottleDefaults,
    pub tracking: TrackingDefaults,
    pub logging: LoggingDefaults,
}

/// Default connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDefaults {
    pub host: String,
    pub port: u16,
    pub connect_timeout_ms: u64,
    pub receive_timeout_ms: u64,
    pub close_grace_ms: u64,
}

/// Default throttle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleDefaults {
    pub bytes_per_second: u32,
}

/// Default tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingDefaults {
    pub interval_ms: u64,
    pub position_address: u64,
    pub offset_x: f64,
    pub offset_z: f64,
    pub scale: f64,
    pub zoom: u8,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        connection: ConnectionDefaults {
            host: "192.168.0.0".to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
            receive_timeout_ms: DEFAULT_RECEIVE_TIMEOUT.as_millis() as u64,
            close_grace_ms: DEFAULT_CLOSE_GRACE.as_millis() as u64,
        },
        throttle: ThrottleDefaults {
            bytes_per_second: DEFAULT_BYTES_PER_SECOND,
        },
        tracking: TrackingDefaults {
            interval_ms: DEFAULT_INTERVAL.as_millis() as u64,
            position_address: DEFAULT_POSITION_ADDRESS,
            offset_x: DEFAULT_OFFSET_X,
            offset_z: DEFAULT_OFFSET_Z,
            scale: DEFAULT_SCALE,
            zoom: DEFAULT_ZOOM,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}
