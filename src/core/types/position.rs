//! World-space and map-space positions

use super::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size in bytes of a packed `(x, y, z)` position of three `f32`s
pub const WORLD_POSITION_SIZE: usize = 12;

/// A position in the game's world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    /// Vertical component
    pub y: f32,
    pub z: f32,
}

impl WorldPosition {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        WorldPosition { x, y, z }
    }

    /// Decodes three consecutive little-endian `f32`s
    pub fn from_le_bytes(bytes: &[u8]) -> BridgeResult<Self> {
        if bytes.len() != WORLD_POSITION_SIZE {
            return Err(BridgeError::malformed(format!(
                "world position needs {WORLD_POSITION_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        let component = |i: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
            f32::from_le_bytes(raw)
        };
        Ok(WorldPosition::new(component(0), component(1), component(2)))
    }
}

/// A point on the map, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl MapPosition {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        MapPosition {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for MapPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
