//! Field catalog of the version 3 record.
//!
//! [`FIELDS`] lists every field of [`SharedMemory`] in record order with the
//! unit, range and unset annotations of the C header. Offsets are taken from
//! the Rust struct itself so the catalog cannot drift from the layout.

use core::mem::offset_of;

use super::SharedMemory;
use crate::types::{
    FieldInfo, FieldRange, FieldType, FixedString, STRING_LENGTH_MAX, TYRE_MAX, VEC_MAX, Value,
    VarData,
};
use crate::{Result, TelemetryError};

const UNIT: Option<FieldRange> = Some(FieldRange::between(0.0, 1.0));
const SIGNED_UNIT: Option<FieldRange> = Some(FieldRange::between(-1.0, 1.0));
const NON_NEGATIVE: Option<FieldRange> = Some(FieldRange::at_least(0.0));
const POSITIVE: Option<FieldRange> = Some(FieldRange::at_least(1.0));

macro_rules! field {
    ($name:literal, $field:ident, $ty:ident x $count:expr, $unit:literal, $range:expr, $unset:expr, $desc:literal) => {
        FieldInfo {
            name: $name,
            field_type: FieldType::$ty,
            offset: offset_of!(SharedMemory, $field),
            count: $count,
            unit: $unit,
            range: $range,
            unset: $unset,
            description: $desc,
        }
    };
}

/// Every field of the record, in layout order.
pub static FIELDS: &[FieldInfo] = &[
    field!("mVersion", version, UInt32 x 1, "", None, None, "Shared memory layout version"),
    field!("mGameState", game_state, UInt32 x 1, "", None, None, "Game state (Type#1)"),
    field!("mSessionState", session_state, UInt32 x 1, "", None, None, "Session state (Type#2)"),
    field!("mUnfilteredThrottle", unfiltered_throttle, Float32 x 1, "", UNIT, None, "Raw throttle input"),
    field!("mUnfilteredBrake", unfiltered_brake, Float32 x 1, "", UNIT, None, "Raw brake input"),
    field!("mUnfilteredSteering", unfiltered_steering, Float32 x 1, "", SIGNED_UNIT, None, "Raw steering input"),
    field!("mUnfilteredClutch", unfiltered_clutch, Float32 x 1, "", UNIT, None, "Raw clutch input"),
    field!("mPlayerName", player_name, Char x STRING_LENGTH_MAX, "", None, None, "Player name"),
    field!("mCarName", car_name, Char x STRING_LENGTH_MAX, "", None, None, "Car name"),
    field!("mCarClassName", car_class_name, Char x STRING_LENGTH_MAX, "", None, None, "Car class name"),
    field!("mTrackName", track_name, Char x STRING_LENGTH_MAX, "", None, None, "Track name"),
    field!("mBestLapTime", best_lap_time, Float32 x 1, "s", NON_NEGATIVE, Some(-1.0), "Best lap time"),
    field!("mLastLapTime", last_lap_time, Float32 x 1, "s", NON_NEGATIVE, Some(0.0), "Last lap time"),
    field!("mCurrentTime", current_time, Float32 x 1, "s", NON_NEGATIVE, Some(0.0), "Current lap time"),
    field!("mBestSector1Time", best_sector1_time, Float32 x 1, "s", NON_NEGATIVE, Some(-1.0), "Best sector 1 time"),
    field!("mCurrentSector1Time", current_sector1_time, Float32 x 1, "s", NON_NEGATIVE, Some(-1.0), "Current sector 1 time"),
    field!("mBestSector2Time", best_sector2_time, Float32 x 1, "s", NON_NEGATIVE, Some(-1.0), "Best sector 2 time"),
    field!("mCurrentSector2Time", current_sector2_time, Float32 x 1, "s", NON_NEGATIVE, Some(-1.0), "Current sector 2 time"),
    field!("mSplitTime", split_time, Float32 x 1, "s", NON_NEGATIVE, Some(0.0), "Split time"),
    field!("mEventTimeRemaining", event_time_remaining, Float32 x 1, "ms", NON_NEGATIVE, Some(-1.0), "Event time remaining"),
    field!("mLapsInEvent", laps_in_event, UInt32 x 1, "", NON_NEGATIVE, Some(0.0), "Laps in event"),
    field!("mLapsCompleted", laps_completed, UInt32 x 1, "", NON_NEGATIVE, Some(0.0), "Laps completed"),
    field!("mCurrentLap", current_lap, UInt32 x 1, "", NON_NEGATIVE, Some(0.0), "Current lap"),
    field!("mCurrentPosition", current_position, UInt32 x 1, "", POSITIVE, Some(0.0), "Race position"),
    field!("mNumberOfCars", number_of_cars, UInt32 x 1, "", POSITIVE, Some(0.0), "Cars in session"),
    field!("mCurrentSector", current_sector, UInt32 x 1, "", None, None, "Current sector (Type#5)"),
    field!("mCarFlags", car_flags, UInt32 x 1, "", None, None, "Car flags (Type#6)"),
    field!("mOilTempCelsius", oil_temp_celsius, Float32 x 1, "C", None, Some(0.0), "Oil temperature"),
    field!("mOilPressureKPa", oil_pressure_kpa, Float32 x 1, "kPa", NON_NEGATIVE, Some(0.0), "Oil pressure"),
    field!("mWaterTempCelsius", water_temp_celsius, Float32 x 1, "C", None, Some(0.0), "Water temperature"),
    field!("mWaterPressureKPa", water_pressure_kpa, Float32 x 1, "kPa", NON_NEGATIVE, Some(0.0), "Water pressure"),
    field!("mFuelPressureKPa", fuel_pressure_kpa, Float32 x 1, "kPa", NON_NEGATIVE, Some(0.0), "Fuel pressure"),
    field!("mFuelLevel", fuel_level, Float32 x 1, "", UNIT, None, "Fuel level as a fraction of capacity"),
    field!("mFuelCapacity", fuel_capacity, Float32 x 1, "l", NON_NEGATIVE, Some(0.0), "Fuel capacity"),
    field!("mSpeed", speed, Float32 x 1, "m/s", NON_NEGATIVE, None, "Speed"),
    field!("mRpm", rpm, Float32 x 1, "rpm", NON_NEGATIVE, Some(0.0), "Engine speed"),
    field!("mMaxRPM", max_rpm, Float32 x 1, "rpm", NON_NEGATIVE, Some(0.0), "Engine speed limit"),
    field!("mBrake", brake, Float32 x 1, "", UNIT, None, "Brake"),
    field!("mThrottle", throttle, Float32 x 1, "", UNIT, None, "Throttle"),
    field!("mClutch", clutch, Float32 x 1, "", UNIT, None, "Clutch"),
    field!("mSteering", steering, Float32 x 1, "", SIGNED_UNIT, None, "Steering"),
    field!("mGear", gear, Int32 x 1, "", Some(FieldRange::at_least(-1.0)), Some(0.0), "Gear, -1 reverse, 0 neutral"),
    field!("mWorldPosition", world_position, Float32 x VEC_MAX, "m", None, None, "World space position"),
    field!("mOrientation", orientation, Float32 x VEC_MAX, "rad", None, None, "Euler angles"),
    field!("mLocalVelocity", local_velocity, Float32 x VEC_MAX, "m/s", None, None, "Local space velocity"),
    field!("mWorldVelocity", world_velocity, Float32 x VEC_MAX, "m/s", None, None, "World space velocity"),
    field!("mAngularVelocity", angular_velocity, Float32 x VEC_MAX, "rad/s", None, None, "Angular velocity"),
    field!("mLocalAcceleration", local_acceleration, Float32 x VEC_MAX, "m/s^2", None, None, "Local space acceleration"),
    field!("mWorldAcceleration", world_acceleration, Float32 x VEC_MAX, "m/s^2", None, None, "World space acceleration"),
    field!("mExtentsCentre", extents_centre, Float32 x VEC_MAX, "m", None, None, "Local space extents centre"),
    field!("mTyreFlags", tyre_flags, UInt32 x TYRE_MAX, "", None, None, "Tyre flags (Type#7)"),
    field!("mTerrain", terrain, UInt32 x TYRE_MAX, "", None, None, "Terrain materials (Type#3)"),
    field!("mTyreY", tyre_y, Float32 x TYRE_MAX, "m", None, None, "Local space tyre Y"),
    field!("mTyreRPS", tyre_rps, Float32 x TYRE_MAX, "rev/s", None, None, "Tyre revolutions per second"),
    field!("mTyreSlipSpeed", tyre_slip_speed, Float32 x TYRE_MAX, "m/s", None, None, "Tyre slip speed"),
    field!("mTyreTemp", tyre_temp, Float32 x TYRE_MAX, "C", None, Some(0.0), "Tyre temperature"),
    field!("mTyreGrip", tyre_grip, Float32 x TYRE_MAX, "", UNIT, None, "Tyre grip"),
    field!("mTyreHeightAboveGround", tyre_height_above_ground, Float32 x TYRE_MAX, "m", None, None, "Local space tyre height above ground"),
    field!("mTyreLateralStiffness", tyre_lateral_stiffness, Float32 x TYRE_MAX, "", None, None, "Lateral stiffness coefficient used in tyre deformation"),
    field!("mTyreWear", tyre_wear, Float32 x TYRE_MAX, "", UNIT, None, "Tyre wear"),
    field!("mBrakeDamage", brake_damage, Float32 x TYRE_MAX, "", UNIT, None, "Brake damage"),
    field!("mSuspensionDamage", suspension_damage, Float32 x TYRE_MAX, "", UNIT, None, "Suspension damage"),
    field!("mCrashState", crash_state, UInt32 x 1, "", None, None, "Crash damage state (Type#4)"),
    field!("mAeroDamage", aero_damage, Float32 x 1, "", UNIT, None, "Aero damage"),
    field!("mEngineDamage", engine_damage, Float32 x 1, "", UNIT, None, "Engine damage"),
    field!("mAmbientTemperature", ambient_temperature, Float32 x 1, "C", None, Some(25.0), "Ambient temperature"),
    field!("mTrackTemperature", track_temperature, Float32 x 1, "C", None, Some(30.0), "Track temperature"),
    field!("mRainDensity", rain_density, Float32 x 1, "", UNIT, None, "How much rain will fall"),
    field!("mWindSpeed", wind_speed, Float32 x 1, "", Some(FieldRange::between(0.0, 100.0)), Some(2.0), "Wind speed"),
    field!("mWindDirectionX", wind_direction_x, Float32 x 1, "", None, None, "Normalised wind direction X"),
    field!("mWindDirectionY", wind_direction_y, Float32 x 1, "", None, None, "Normalised wind direction Y"),
    field!("mCloudBrightness", cloud_brightness, Float32 x 1, "", NON_NEGATIVE, None, "Cloud brightness"),
];

/// Catalog entry for `name` (`"mSpeed"`).
pub fn field(name: &str) -> Option<&'static FieldInfo> {
    FIELDS.iter().find(|info| info.name == name)
}

/// Read any field of a raw record as a dynamic [`Value`].
pub fn read_value(data: &[u8], info: &FieldInfo) -> Result<Value> {
    if info.field_type == FieldType::Char {
        return Ok(Value::Text(String::from_bytes(data, info)?));
    }

    let scalar = |offset: usize| -> Result<Value> {
        let element = FieldInfo { offset, count: 1, ..*info };
        match info.field_type {
            FieldType::UInt32 => Ok(Value::UInt32(u32::from_bytes(data, &element)?)),
            FieldType::Int32 => Ok(Value::Int32(i32::from_bytes(data, &element)?)),
            FieldType::Float32 => Ok(Value::Float32(f32::from_bytes(data, &element)?)),
            FieldType::Char => Err(TelemetryError::TypeConversion {
                details: format!("Field '{}' is a string", info.name),
            }),
        }
    };

    if info.count == 1 {
        return scalar(info.offset);
    }

    (0..info.count)
        .map(|i| scalar(info.offset + i * info.field_type.size()))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

impl SharedMemory {
    /// Read a field by its header name, as a generic display would.
    pub fn value(&self, name: &str) -> Result<Value> {
        let info = field(name).ok_or_else(|| TelemetryError::FieldNotFound { field: name.to_string() })?;
        read_value(self.as_bytes(), info)
    }

    /// Every field with its current value, in record order.
    pub fn values(&self) -> Result<Vec<(&'static str, Value)>> {
        FIELDS
            .iter()
            .map(|info| Ok((info.name, read_value(self.as_bytes(), info)?)))
            .collect()
    }

    /// A string field by header name.
    pub fn text(&self, name: &str) -> Result<FixedString> {
        let info = field(name).ok_or_else(|| TelemetryError::FieldNotFound { field: name.to_string() })?;
        FixedString::from_bytes(self.as_bytes(), info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SNAPSHOT_SIZE;
    use crate::types::SnapshotSchema;

    #[test]
    fn catalog_covers_the_whole_record_without_gaps() {
        let mut next = 0;
        for info in FIELDS {
            assert_eq!(info.offset, next, "gap before {}", info.name);
            next = info.end();
        }
        assert_eq!(next, SNAPSHOT_SIZE);
        assert_eq!(FIELDS.len(), 72);
    }

    #[test]
    fn current_schema_validates() {
        let schema = SnapshotSchema::current();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.field_count(), FIELDS.len());
        assert!(schema.has_field("mCloudBrightness"));
        assert!(!schema.has_field("mSessionTime"));
    }

    #[test]
    fn published_offsets_match_the_header() {
        let expected = [
            ("mVersion", 0),
            ("mPlayerName", 28),
            ("mCarName", 284),
            ("mCarClassName", 540),
            ("mTrackName", 796),
            ("mEventTimeRemaining", 1084),
            ("mCarFlags", 1112),
            ("mGear", 1172),
            ("mTyreFlags", 1272),
            ("mTerrain", 1288),
            ("mSuspensionDamage", 1448),
            ("mAmbientTemperature", 1476),
            ("mCloudBrightness", 1500),
        ];
        for (name, offset) in expected {
            assert_eq!(field(name).map(|info| info.offset), Some(offset), "{name}");
        }
    }

    #[test]
    fn value_reads_scalars_arrays_and_strings() {
        let mut record = SharedMemory::default();
        record.speed = 45.5;
        record.gear = -1;
        record.set_car_name("Formula A");
        record.tyre_temp = [70.0, 71.0, 72.0, 73.0].into();

        assert_eq!(record.value("mSpeed").unwrap(), Value::Float32(45.5));
        assert_eq!(record.value("mGear").unwrap(), Value::Int32(-1));
        assert_eq!(record.value("mCarName").unwrap(), Value::Text("Formula A".into()));
        assert_eq!(record.value("mVersion").unwrap(), Value::UInt32(3));

        let temps = record.value("mTyreTemp").unwrap();
        assert_eq!(temps.as_array().map(<[Value]>::len), Some(4));
        assert_eq!(temps.as_array().unwrap()[2], Value::Float32(72.0));
    }

    #[test]
    fn unknown_field_is_reported() {
        let record = SharedMemory::default();
        assert!(matches!(
            record.value("mBoost"),
            Err(TelemetryError::FieldNotFound { field }) if field == "mBoost"
        ));
    }

    #[test]
    fn values_lists_every_field() {
        let values = SharedMemory::default().values().unwrap();
        assert_eq!(values.len(), FIELDS.len());
        assert_eq!(values[0], ("mVersion", Value::UInt32(3)));
    }
}
