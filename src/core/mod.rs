//! Core module containing fundamental types for live-map-core
//!
//! This module provides the foundational building blocks used throughout
//! the crate, including address handling, typed values, positions and
//! error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, AddressSpec, BridgeError, BridgeResult, ErrorKind, MapPosition, MemoryValue,
    PointerChain, ValueType, WorldPosition,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
