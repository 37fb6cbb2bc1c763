//! Core type definitions for live-map-core
//!
//! This module contains the fundamental types shared by every layer:
//! remote addresses and addressing modes, typed values, positions and
//! the error taxonomy.

mod address;
mod error;
mod position;
mod value;

// Re-export all public types
pub use address::{Address, AddressSpec, PointerChain};
pub use error::{BridgeError, BridgeResult, ErrorKind};
pub use position::{MapPosition, WorldPosition, WORLD_POSITION_SIZE};
pub use value::{le_uint, MemoryValue, ValueType};
