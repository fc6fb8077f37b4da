//! Wheel positions and the four-slot per-tyre array

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Index of the front-left wheel in every per-tyre array
pub const TYRE_FRONT_LEFT: usize = 0;
/// Index of the front-right wheel
pub const TYRE_FRONT_RIGHT: usize = 1;
/// Index of the rear-left wheel
pub const TYRE_REAR_LEFT: usize = 2;
/// Index of the rear-right wheel
pub const TYRE_REAR_RIGHT: usize = 3;
/// Number of slots in every per-tyre array
pub const TYRE_MAX: usize = 4;

/// Wheel position. The discriminant is the array index in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Tyre {
    FrontLeft = 0,
    FrontRight = 1,
    RearLeft = 2,
    RearRight = 3,
}

impl Tyre {
    /// All wheels in record index order.
    pub const ALL: [Tyre; TYRE_MAX] = [Tyre::FrontLeft, Tyre::FrontRight, Tyre::RearLeft, Tyre::RearRight];

    /// Array slot of this wheel.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wheel stored at `index`, if the index is in range.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            TYRE_FRONT_LEFT => Some(Tyre::FrontLeft),
            TYRE_FRONT_RIGHT => Some(Tyre::FrontRight),
            TYRE_REAR_LEFT => Some(Tyre::RearLeft),
            TYRE_REAR_RIGHT => Some(Tyre::RearRight),
            _ => None,
        }
    }

    pub const fn is_front(self) -> bool {
        matches!(self, Tyre::FrontLeft | Tyre::FrontRight)
    }

    pub const fn is_left(self) -> bool {
        matches!(self, Tyre::FrontLeft | Tyre::RearLeft)
    }
}

/// One value per wheel, laid out exactly like `T[TYRE_MAX]`.
///
/// Slot order is front-left, front-right, rear-left, rear-right.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PerTyre<T>(pub [T; TYRE_MAX]);

impl<T> PerTyre<T> {
    pub const fn new(values: [T; TYRE_MAX]) -> Self {
        Self(values)
    }

    /// Value for a single wheel.
    pub fn get(&self, tyre: Tyre) -> &T {
        &self.0[tyre.index()]
    }

    /// Iterate `(wheel, value)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (Tyre, &T)> {
        Tyre::ALL.into_iter().zip(self.0.iter())
    }

    /// Apply `f` to every slot, keeping the wheel mapping.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PerTyre<U> {
        PerTyre(self.0.map(f))
    }

    pub fn as_array(&self) -> &[T; TYRE_MAX] {
        &self.0
    }

    pub fn into_array(self) -> [T; TYRE_MAX] {
        self.0
    }
}

impl<T: Copy> PerTyre<T> {
    /// Same value on every wheel.
    pub const fn splat(value: T) -> Self {
        Self([value; TYRE_MAX])
    }
}

impl<T> Index<Tyre> for PerTyre<T> {
    type Output = T;

    fn index(&self, tyre: Tyre) -> &T {
        &self.0[tyre.index()]
    }
}

impl<T> IndexMut<Tyre> for PerTyre<T> {
    fn index_mut(&mut self, tyre: Tyre) -> &mut T {
        &mut self.0[tyre.index()]
    }
}

impl<T> From<[T; TYRE_MAX]> for PerTyre<T> {
    fn from(values: [T; TYRE_MAX]) -> Self {
        Self(values)
    }
}
