//! Configuration module for live-map-core
//!
//! Provides configuration loading, validation, and default settings.
//! The library itself runs on plain values (`SessionOptions`,
//! `TrackingConfig`); this module turns a TOML file into them.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use validator::{validate_config, ConfigValidator};

// Re-export the main configuration structures
pub use loader::{Config, ConnectionConfig, LoggingConfig, ThrottleConfig, TrackingSection};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
