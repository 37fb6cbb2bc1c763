//! Configuration validator for live-map-core
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, ConnectionConfig, LoggingConfig, TrackingSection};
use crate::core::types::PointerChain;

/// Shortest polling interval accepted; faster polling floods the bridge
const MIN_INTERVAL_MS: u64 = 100;

/// Deepest zoom the tile math is defined for
const MAX_ZOOM: u8 = 30;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_connection(&config.connection)?;
        Self::validate_tracking(&config.tracking)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates connection configuration
    fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        if connection.host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Connection host cannot be empty".to_string(),
            ));
        }

        if connection.port == 0 {
            return Err(ConfigError::Invalid(
                "Connection port cannot be 0".to_string(),
            ));
        }

        if connection.connect_timeout_ms == 0 || connection.receive_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Connection timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates tracking configuration
    fn validate_tracking(tracking: &TrackingSection) -> Result<(), ConfigError> {
        if tracking.interval_ms < MIN_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "Tracking interval must be at least {MIN_INTERVAL_MS} ms"
            )));
        }

        if let Some(chain) = &tracking.position_pointer {
            chain.parse::<PointerChain>().map_err(|e| {
                ConfigError::Invalid(format!("Invalid position pointer: {e}"))
            })?;
        }

        let calibration = &tracking.calibration;
        if !calibration.scale.is_finite() || calibration.scale == 0.0 {
            return Err(ConfigError::Invalid(
                "Calibration scale must be finite and non-zero".to_string(),
            ));
        }

        if !calibration.offset_x.is_finite() || !calibration.offset_z.is_finite() {
            return Err(ConfigError::Invalid(
                "Calibration offsets must be finite".to_string(),
            ));
        }

        if calibration.zoom > MAX_ZOOM {
            return Err(ConfigError::Invalid(format!(
                "Calibration zoom cannot exceed {MAX_ZOOM}"
            )));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
