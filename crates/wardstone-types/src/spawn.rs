//! Spawn position geometry.

use serde::{Deserialize, Serialize};

/// A fixed world position (with facing) at which an encounter can spawn.
///
/// Positions come from static content tables; the manager only picks one
/// and forwards it to the spawn registry, it never moves anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPosition {
    /// World X coordinate.
    pub x: f32,
    /// World Y coordinate.
    pub y: f32,
    /// World Z coordinate.
    pub z: f32,
    /// Facing angle in radians.
    pub orientation: f32,
}

impl SpawnPosition {
    /// Construct a position from raw coordinates.
    pub const fn new(x: f32, y: f32, z: f32, orientation: f32) -> Self {
        Self {
            x,
            y,
            z,
            orientation,
        }
    }
}
