//! Fully typed view of one snapshot

use serde::{Deserialize, Serialize};

use super::{AdapterValidation, FieldExtraction, FrameAdapter};
use crate::schema::{FIELDS, SHARED_MEMORY_VERSION, SharedMemory};
use crate::types::{
    CarFlags, CrashState, FramePacket, GameState, PerTyre, Sector, SessionState, SnapshotSchema,
    Terrain, TyreFlags, Vec3,
};
use crate::{Result, TelemetryError};

fn set_if(value: f32, unset: f32) -> Option<f32> {
    (value != unset).then_some(value)
}

fn count_if_set(value: u32) -> Option<u32> {
    (value != 0).then_some(value)
}

/// Names of the car and venue.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Identity {
    pub player_name: String,
    pub car_name: String,
    pub car_class_name: String,
    pub track_name: String,
}

/// Raw driver inputs before assists and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct UnfilteredInputs {
    pub throttle: f32,
    pub brake: f32,
    pub steering: f32,
    pub clutch: f32,
}

/// Lap and sector times in seconds; `None` until the time exists.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Timing {
    pub best_lap: Option<f32>,
    pub last_lap: Option<f32>,
    pub current_lap: Option<f32>,
    pub best_sector1: Option<f32>,
    pub current_sector1: Option<f32>,
    pub best_sector2: Option<f32>,
    pub current_sector2: Option<f32>,
    pub split: Option<f32>,
    /// Milliseconds; `None` for lap-limited events
    pub event_time_remaining_ms: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RaceInfo {
    pub laps_in_event: Option<u32>,
    pub laps_completed: u32,
    pub current_lap: u32,
    pub position: Option<u32>,
    pub number_of_cars: Option<u32>,
    pub sector: Sector,
}

/// Engine, fuel and driver controls.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarState {
    /// Raw `mCarFlags`; decode with [`CarState::flags`]
    pub flags: u32,
    pub oil_temp_celsius: Option<f32>,
    pub oil_pressure_kpa: Option<f32>,
    pub water_temp_celsius: Option<f32>,
    pub water_pressure_kpa: Option<f32>,
    pub fuel_pressure_kpa: Option<f32>,
    pub fuel_level: f32,
    pub fuel_capacity: Option<f32>,
    /// Metres per second
    pub speed: f32,
    pub rpm: Option<f32>,
    pub max_rpm: Option<f32>,
    pub brake: f32,
    pub throttle: f32,
    pub clutch: f32,
    pub steering: f32,
    /// -1 reverse, 0 neutral, 1.. forward
    pub gear: i32,
}

impl CarState {
    pub fn flags(&self) -> CarFlags {
        CarFlags::from_raw(self.flags)
    }

    /// Fuel on board in litres, when the capacity is known.
    pub fn fuel_litres(&self) -> Option<f32> {
        self.fuel_capacity.map(|capacity| capacity * self.fuel_level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Motion {
    pub world_position: Vec3,
    pub orientation: Vec3,
    pub local_velocity: Vec3,
    pub world_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub local_acceleration: Vec3,
    pub world_acceleration: Vec3,
    pub extents_centre: Vec3,
}

/// Everything the record publishes about one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TyreState {
    /// Raw `mTyreFlags` entry; decode with [`TyreState::flags`]
    pub flags: u32,
    pub terrain: Terrain,
    pub y: f32,
    pub rps: f32,
    pub slip_speed: f32,
    pub temp_celsius: Option<f32>,
    pub grip: f32,
    pub height_above_ground: f32,
    pub lateral_stiffness: f32,
    pub wear: f32,
    pub brake_damage: f32,
    pub suspension_damage: f32,
}

impl TyreState {
    pub fn flags(&self) -> TyreFlags {
        TyreFlags::from_raw(self.flags)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Damage {
    pub crash_state: CrashState,
    pub aero: f32,
    pub engine: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Weather {
    pub ambient_temperature: f32,
    pub track_temperature: f32,
    pub rain_density: f32,
    pub wind_speed: f32,
    pub wind_direction_x: f32,
    pub wind_direction_y: f32,
    pub cloud_brightness: f32,
}

/// A decoded snapshot: enums resolved, sentinels mapped to `None`, strings owned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TelemetryFrame {
    pub game_state: GameState,
    pub session_state: SessionState,
    pub identity: Identity,
    pub unfiltered: UnfilteredInputs,
    pub timing: Timing,
    pub race: RaceInfo,
    pub car: CarState,
    pub motion: Motion,
    pub tyres: PerTyre<TyreState>,
    pub damage: Damage,
    pub weather: Weather,
}

impl TelemetryFrame {
    /// Decode a snapshot that has already passed the version check.
    pub fn from_snapshot(record: &SharedMemory) -> Self {
        let terrain = record.terrain();

        Self {
            game_state: record.game_state(),
            session_state: record.session_state(),
            identity: Identity {
                player_name: record.player_name.to_string_lossy().into_owned(),
                car_name: record.car_name.to_string_lossy().into_owned(),
                car_class_name: record.car_class_name.to_string_lossy().into_owned(),
                track_name: record.track_name.to_string_lossy().into_owned(),
            },
            unfiltered: UnfilteredInputs {
                throttle: record.unfiltered_throttle,
                brake: record.unfiltered_brake,
                steering: record.unfiltered_steering,
                clutch: record.unfiltered_clutch,
            },
            timing: Timing {
                best_lap: set_if(record.best_lap_time, -1.0),
                last_lap: set_if(record.last_lap_time, 0.0),
                current_lap: set_if(record.current_time, 0.0),
                best_sector1: set_if(record.best_sector1_time, -1.0),
                current_sector1: set_if(record.current_sector1_time, -1.0),
                best_sector2: set_if(record.best_sector2_time, -1.0),
                current_sector2: set_if(record.current_sector2_time, -1.0),
                split: set_if(record.split_time, 0.0),
                event_time_remaining_ms: set_if(record.event_time_remaining, -1.0),
            },
            race: RaceInfo {
                laps_in_event: count_if_set(record.laps_in_event),
                laps_completed: record.laps_completed,
                current_lap: record.current_lap,
                position: count_if_set(record.current_position),
                number_of_cars: count_if_set(record.number_of_cars),
                sector: record.current_sector(),
            },
            car: CarState {
                flags: record.car_flags.bits(),
                oil_temp_celsius: set_if(record.oil_temp_celsius, 0.0),
                oil_pressure_kpa: set_if(record.oil_pressure_kpa, 0.0),
                water_temp_celsius: set_if(record.water_temp_celsius, 0.0),
                water_pressure_kpa: set_if(record.water_pressure_kpa, 0.0),
                fuel_pressure_kpa: set_if(record.fuel_pressure_kpa, 0.0),
                fuel_level: record.fuel_level,
                fuel_capacity: set_if(record.fuel_capacity, 0.0),
                speed: record.speed,
                rpm: set_if(record.rpm, 0.0),
                max_rpm: set_if(record.max_rpm, 0.0),
                brake: record.brake,
                throttle: record.throttle,
                clutch: record.clutch,
                steering: record.steering,
                gear: record.gear,
            },
            motion: Motion {
                world_position: record.world_position,
                orientation: record.orientation,
                local_velocity: record.local_velocity,
                world_velocity: record.world_velocity,
                angular_velocity: record.angular_velocity,
                local_acceleration: record.local_acceleration,
                world_acceleration: record.world_acceleration,
                extents_centre: record.extents_centre,
            },
            tyres: PerTyre::new(std::array::from_fn(|i| TyreState {
                flags: record.tyre_flags.0[i].bits(),
                terrain: terrain.0[i],
                y: record.tyre_y.0[i],
                rps: record.tyre_rps.0[i],
                slip_speed: record.tyre_slip_speed.0[i],
                temp_celsius: set_if(record.tyre_temp.0[i], 0.0),
                grip: record.tyre_grip.0[i],
                height_above_ground: record.tyre_height_above_ground.0[i],
                lateral_stiffness: record.tyre_lateral_stiffness.0[i],
                wear: record.tyre_wear.0[i],
                brake_damage: record.brake_damage.0[i],
                suspension_damage: record.suspension_damage.0[i],
            })),
            damage: Damage {
                crash_state: record.crash_state(),
                aero: record.aero_damage,
                engine: record.engine_damage,
            },
            weather: Weather {
                ambient_temperature: record.ambient_temperature,
                track_temperature: record.track_temperature,
                rain_density: record.rain_density,
                wind_speed: record.wind_speed,
                wind_direction_x: record.wind_direction_x,
                wind_direction_y: record.wind_direction_y,
                cloud_brightness: record.cloud_brightness,
            },
        }
    }
}

/// Every adapter decoding the whole record checks the schema the same way.
fn validate_whole_record(schema: &SnapshotSchema) -> Result<AdapterValidation> {
    if schema.version != SHARED_MEMORY_VERSION {
        return Err(TelemetryError::unsupported_version(schema.version));
    }

    let plan = FIELDS
        .iter()
        .map(|info| FieldExtraction::required(schema, info.name))
        .collect::<Result<Vec<_>>>()?;
    Ok(AdapterValidation::new(plan))
}

impl FrameAdapter for TelemetryFrame {
    fn validate_schema(schema: &SnapshotSchema) -> Result<AdapterValidation> {
        validate_whole_record(schema)
    }

    fn adapt(packet: &FramePacket, _validation: &AdapterValidation) -> Self {
        Self::from_snapshot(&packet.snapshot)
    }
}

impl FrameAdapter for SharedMemory {
    fn validate_schema(schema: &SnapshotSchema) -> Result<AdapterValidation> {
        validate_whole_record(schema)
    }

    fn adapt(packet: &FramePacket, _validation: &AdapterValidation) -> Self {
        *packet.snapshot
    }
}

impl From<&SharedMemory> for TelemetryFrame {
    fn from(record: &SharedMemory) -> Self {
        Self::from_snapshot(record)
    }
}
