//! World-space to map-space conversion

use crate::core::types::{MapPosition, WorldPosition};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const DEFAULT_OFFSET_X: f64 = 2.072021484;
pub const DEFAULT_OFFSET_Z: f64 = 5505.240018;
pub const DEFAULT_SCALE: f64 = 5000.0;
pub const DEFAULT_ZOOM: u8 = 0;

/// Calibration of the game's ground plane against the map tiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub offset_x: f64,
    pub offset_z: f64,
    /// World units per tile at `zoom`
    pub scale: f64,
    pub zoom: u8,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            offset_x: DEFAULT_OFFSET_X,
            offset_z: DEFAULT_OFFSET_Z,
            scale: DEFAULT_SCALE,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Calibration {
    /// Tile-space coordinates of a ground-plane point
    pub fn to_tile(&self, world_x: f64, world_z: f64) -> (f64, f64) {
        (
            (world_x + self.offset_x) / self.scale,
            (world_z + self.offset_z) / self.scale,
        )
    }

    /// Map position of a world position; the vertical component is ignored
    pub fn to_map(&self, world: WorldPosition) -> MapPosition {
        let (u, v) = self.to_tile(f64::from(world.x), f64::from(world.z));
        tile_to_degrees(u, v, self.zoom)
    }
}

/// Web-Mercator tile coordinates to latitude/longitude in degrees
pub fn tile_to_degrees(tile_x: f64, tile_y: f64, zoom: u8) -> MapPosition {
    let n = f64::from(2u32.pow(u32::from(zoom.min(31))));
    let longitude = tile_x / n * 360.0 - 180.0;
    let latitude = (PI * (1.0 - 2.0 * tile_y / n)).sinh().atan().to_degrees();
    MapPosition::new(latitude, longitude)
}
