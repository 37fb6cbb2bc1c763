//! Continuous position tracking
//!
//! - `transform` projects world coordinates onto the map
//! - `poller` samples the position on a fixed interval and reports it

pub mod poller;
pub mod transform;

pub use poller::{TrackingConfig, TrackingSession, DEFAULT_INTERVAL, DEFAULT_POSITION_ADDRESS};
pub use transform::{tile_to_degrees, Calibration};
