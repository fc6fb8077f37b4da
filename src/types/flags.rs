//! Bitmask flag sets for car and tyre state (header types #6 and #7)
//!
//! Both sets are stored as a plain `u32` in the record. Bits the producer sets
//! beyond the defined ones are retained (`from_bits_retain`) so a newer
//! producer's flags survive a round trip through this crate untouched.

use bitflags::bitflags;

bitflags! {
    /// Car state flags, stored in `mCarFlags`.
    ///
    /// Bit positions are part of the record contract and must not change
    /// without bumping the shared memory version.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct CarFlags: u32 {
        /// Headlights on
        const HEADLIGHT      = 1 << 0;
        /// Engine running
        const ENGINE_ACTIVE  = 1 << 1;
        /// Engine warning light
        const ENGINE_WARNING = 1 << 2;
        /// Pit speed limiter engaged
        const SPEED_LIMITER  = 1 << 3;
        /// ABS active
        const ABS            = 1 << 4;
        /// Handbrake applied
        const HANDBRAKE      = 1 << 5;
    }
}

bitflags! {
    /// Per-wheel tyre flags, stored in `mTyreFlags`.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct TyreFlags: u32 {
        /// Wheel is attached to the car
        const ATTACHED     = 1 << 0;
        /// Tyre is inflated
        const INFLATED     = 1 << 1;
        /// Tyre is in contact with the ground
        const IS_ON_GROUND = 1 << 2;
    }
}

impl CarFlags {
    /// Decode a raw `mCarFlags` value, keeping undefined bits.
    pub const fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Bits set in the record that this build does not define.
    pub const fn unknown_bits(self) -> u32 {
        self.bits() & !Self::all().bits()
    }
}

impl TyreFlags {
    /// Decode a raw `mTyreFlags` value, keeping undefined bits.
    pub const fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw)
    }

    /// Bits set in the record that this build does not define.
    pub const fn unknown_bits(self) -> u32 {
        self.bits() & !Self::all().bits()
    }

    /// A healthy wheel in contact with the track.
    pub const fn is_planted(self) -> bool {
        self.contains(Self::ATTACHED.union(Self::INFLATED).union(Self::IS_ON_GROUND))
    }
}
