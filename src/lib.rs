//! live-map-core: a client for console debug bridges that speak the
//! sys-botbase line protocol, plus a live position tracker built on it.
//!
//! Layers, leaves first:
//! - [`protocol`]: command encoding, reply framing, address resolution
//! - [`transport`]: the TCP session, throttling, controller input
//! - [`tracking`]: periodic position sampling and map projection
//! - [`controller`]: connection lifecycle and fatal-error recovery
//! - [`config`]: TOML configuration for the binary

pub mod config;
pub mod controller;
pub mod core;
pub mod events;
pub mod protocol;
pub mod tracking;
pub mod transport;

// Re-export main types from core module
pub use core::types::{
    Address, AddressSpec, BridgeError, BridgeResult, ErrorKind, MapPosition, MemoryValue,
    PointerChain, ValueType, WorldPosition,
};

pub use controller::{ConnectionState, Controller, ControllerSettings, OperatorNotice};
pub use events::BridgeEvent;
pub use tracking::{Calibration, TrackingConfig, TrackingSession};
pub use transport::{Button, Session, SessionOptions, Stick, Throttle};
