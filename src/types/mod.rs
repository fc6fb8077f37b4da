//! Core types for telemetry data representation.
//!
//! This module provides the vocabulary of the shared memory record and the
//! metadata used to access it dynamically.
//!
//! ## Architecture
//!
//! The types map directly to the C header's declarations:
//! - [`GameState`], [`SessionState`], [`Terrain`], [`CrashState`] and [`Sector`]
//!   are the five numbered enumerations, each keeping unknown discriminants
//! - [`CarFlags`] and [`TyreFlags`] are the two bitmask types
//! - [`Vec3`] and [`PerTyre`] are the fixed-size `float[VEC_MAX]` and `T[TYRE_MAX]` arrays
//! - [`FixedString`] is the bounded `char[STRING_LENGTH_MAX]` buffer
//! - [`SnapshotSchema`] describes every field with O(1) lookup by name
//! - [`VarData`] provides type-checked parsing from raw record bytes
//! - [`FramePacket`] is one snapshot copied out of the segment
//!
//! ## Usage Example
//!
//! ```rust
//! use pcars_shm::types::{SnapshotSchema, VarData};
//! use pcars_shm::SharedMemory;
//!
//! let mut record = SharedMemory::default();
//! record.speed = 45.5;
//!
//! let schema = SnapshotSchema::current();
//! let speed_info = schema.get_field("mSpeed").unwrap();
//! let speed = f32::from_bytes(record.as_bytes(), speed_info).unwrap();
//! assert_eq!(speed, 45.5);
//! ```

mod damage;
mod discriminant;
mod field_type;
mod fixed_string;
mod flags;
mod frame;
mod schema;
mod sector;
mod session;
mod terrain;
mod tyre;
mod update_rate;
mod var_data;
mod vector;

pub use damage::CrashState;
pub use field_type::{FieldType, Value};
pub use fixed_string::{FixedString, STRING_LENGTH_MAX};
pub use flags::{CarFlags, TyreFlags};
pub use frame::{FramePacket, ReadConsistency};
pub use schema::{FieldInfo, FieldRange, SnapshotSchema};
pub use sector::Sector;
pub use session::{GameState, SessionState};
pub use terrain::Terrain;
pub use tyre::{
    PerTyre, TYRE_FRONT_LEFT, TYRE_FRONT_RIGHT, TYRE_MAX, TYRE_REAR_LEFT, TYRE_REAR_RIGHT, Tyre,
};
pub use update_rate::UpdateRate;
pub(crate) use update_rate::poll_hz;
pub use var_data::{FieldWord, VarData};
pub use vector::{VEC_MAX, VEC_X, VEC_Y, VEC_Z, Vec3};

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn info(field_type: FieldType, offset: usize, count: usize) -> FieldInfo {
        FieldInfo {
            name: "test",
            field_type,
            offset,
            count,
            unit: "",
            range: None,
            unset: None,
            description: "test",
        }
    }

    proptest! {
        #[test]
        fn prop_vardata_reads_f32_bit_exact(value in any::<f32>(), offset in 0..100usize) {
            let mut data = vec![0u8; offset + 4 + 10];
            data[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());

            let parsed = f32::from_bytes(&data, &info(FieldType::Float32, offset, 1)).unwrap();
            prop_assert_eq!(parsed.to_bits(), value.to_bits());
        }

        #[test]
        fn prop_vardata_reads_i32(value in any::<i32>(), offset in 0..100usize) {
            let mut data = vec![0u8; offset + 4 + 10];
            data[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());

            let parsed = i32::from_bytes(&data, &info(FieldType::Int32, offset, 1)).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn prop_flags_retain_every_bit_pattern(raw in any::<u32>()) {
            let car = CarFlags::from_raw(raw);
            let tyre = TyreFlags::from_raw(raw);

            prop_assert_eq!(car.bits(), raw);
            prop_assert_eq!(tyre.bits(), raw);
            prop_assert_eq!(car.unknown_bits(), raw & !0x3F);
            prop_assert_eq!(tyre.unknown_bits(), raw & !0x7);
        }

        #[test]
        fn prop_enums_never_lose_the_raw_value(raw in any::<u32>()) {
            prop_assert_eq!(GameState::from_raw(raw).raw(), raw);
            prop_assert_eq!(SessionState::from_raw(raw).raw(), raw);
            prop_assert_eq!(Terrain::from_raw(raw).raw(), raw);
            prop_assert_eq!(CrashState::from_raw(raw).raw(), raw);
            prop_assert_eq!(Sector::from_raw(raw).raw(), raw);
        }

        #[test]
        fn prop_short_buffers_are_memory_errors(len in 0..4usize) {
            let data = vec![0u8; len];
            let result = u32::from_bytes(&data, &info(FieldType::UInt32, 0, 1));
            prop_assert!(
                matches!(result, Err(crate::TelemetryError::Memory { offset: 0, .. })),
                "expected memory error"
            );
        }
    }

    #[test]
    fn field_type_size_returns_correct_values() {
        assert_eq!(FieldType::UInt32.size(), 4);
        assert_eq!(FieldType::Int32.size(), 4);
        assert_eq!(FieldType::Float32.size(), 4);
        assert_eq!(FieldType::Char.size(), 1);
    }

    #[test]
    fn enum_discriminants_match_header() {
        assert_eq!(GameState::InGamePlaying.raw(), 2);
        assert_eq!(SessionState::TimeAttack.raw(), 5);
        assert_eq!(Sector::Stop.raw(), 5);
        assert_eq!(CrashState::Rolling.raw(), 4);
        assert_eq!(Terrain::Road.raw(), 0);
        assert_eq!(Terrain::SnowFull.raw(), 34);
        assert_eq!(Terrain::ALL.len(), 35);
    }

    #[test]
    fn unknown_discriminants_are_reported_not_rejected() {
        let state = GameState::from_raw(9);
        assert_eq!(state, GameState::Unknown(9));
        assert!(!state.is_known());
        assert_eq!(state.to_string(), "UNKNOWN(9)");
        assert_eq!(Terrain::from_raw(35), Terrain::Unknown(35));
    }

    #[test]
    fn flag_bit_positions_match_header() {
        assert_eq!(CarFlags::HEADLIGHT.bits(), 1);
        assert_eq!(CarFlags::ENGINE_ACTIVE.bits(), 2);
        assert_eq!(CarFlags::ENGINE_WARNING.bits(), 4);
        assert_eq!(CarFlags::SPEED_LIMITER.bits(), 8);
        assert_eq!(CarFlags::ABS.bits(), 16);
        assert_eq!(CarFlags::HANDBRAKE.bits(), 32);
        assert_eq!(TyreFlags::ATTACHED.bits(), 1);
        assert_eq!(TyreFlags::INFLATED.bits(), 2);
        assert_eq!(TyreFlags::IS_ON_GROUND.bits(), 4);
        assert!(TyreFlags::all().is_planted());
    }

    #[test]
    fn tyre_indices_are_load_bearing() {
        assert_eq!(Tyre::FrontLeft.index(), TYRE_FRONT_LEFT);
        assert_eq!(Tyre::FrontRight.index(), TYRE_FRONT_RIGHT);
        assert_eq!(Tyre::RearLeft.index(), TYRE_REAR_LEFT);
        assert_eq!(Tyre::RearRight.index(), TYRE_REAR_RIGHT);
        assert_eq!(Tyre::from_index(4), None);

        let temps = PerTyre::new([80.0f32, 81.0, 82.0, 83.0]);
        assert_eq!(temps[Tyre::RearLeft], 82.0);
        let order: Vec<_> = temps.iter().map(|(tyre, _)| tyre).collect();
        assert_eq!(order, Tyre::ALL);
    }

    #[test]
    fn per_tyre_vardata_reads_in_wheel_order() {
        let mut data = vec![0u8; 16];
        for (i, value) in [1.0f32, 2.0, 3.0, 4.0].iter().enumerate() {
            data[i * 4..i * 4 + 4].copy_from_slice(&value.to_ne_bytes());
        }

        let wear = PerTyre::<f32>::from_bytes(&data, &info(FieldType::Float32, 0, 4)).unwrap();
        assert_eq!(wear[Tyre::FrontLeft], 1.0);
        assert_eq!(wear[Tyre::RearRight], 4.0);
    }

    #[test]
    fn vardata_rejects_mismatched_shapes() {
        let data = vec![0u8; 16];
        let scalar = info(FieldType::Float32, 0, 1);

        assert!(matches!(
            u32::from_bytes(&data, &scalar),
            Err(crate::TelemetryError::TypeConversion { .. })
        ));
        assert!(matches!(
            Vec3::from_bytes(&data, &scalar),
            Err(crate::TelemetryError::TypeConversion { .. })
        ));
    }

    #[test]
    fn update_rate_normalizes_against_poll_rate() {
        assert_eq!(UpdateRate::Max(200).normalize(100.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(0).normalize(100.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(10).normalize(100.0), UpdateRate::Max(10));
        assert!(!UpdateRate::Native.needs_throttle(100.0));
        assert_eq!(
            UpdateRate::Max(10).throttle_interval(100.0),
            Some(std::time::Duration::from_millis(100))
        );
    }

    #[test]
    fn field_range_rejects_nan_and_out_of_bounds() {
        let unit = FieldRange::between(0.0, 1.0);
        assert!(unit.contains(0.0));
        assert!(unit.contains(1.0));
        assert!(!unit.contains(1.01));
        assert!(!unit.contains(f32::NAN));
        assert!(FieldRange::at_least(0.0).contains(1.0e9));
    }
}
