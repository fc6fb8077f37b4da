//! Three-component spatial vector used by the motion fields

use serde::{Deserialize, Serialize};

/// Index of the X component in the record's vector arrays
pub const VEC_X: usize = 0;
/// Index of the Y component
pub const VEC_Y: usize = 1;
/// Index of the Z component
pub const VEC_Z: usize = 2;
/// Number of components in every record vector
pub const VEC_MAX: usize = 3;

/// An `(X, Y, Z)` float triple with the same layout as `float[VEC_MAX]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    /// Create a vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build from the record's `[X, Y, Z]` order.
    pub const fn from_array(values: [f32; VEC_MAX]) -> Self {
        Self { x: values[VEC_X], y: values[VEC_Y], z: values[VEC_Z] }
    }

    /// Components in `[X, Y, Z]` order.
    pub const fn to_array(self) -> [f32; VEC_MAX] {
        [self.x, self.y, self.z]
    }

    /// Euclidean length.
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// True when every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; VEC_MAX]> for Vec3 {
    fn from(values: [f32; VEC_MAX]) -> Self {
        Self::from_array(values)
    }
}

impl From<Vec3> for [f32; VEC_MAX] {
    fn from(value: Vec3) -> Self {
        value.to_array()
    }
}
