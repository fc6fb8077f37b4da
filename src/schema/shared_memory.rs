//! The version 3 telemetry record.
//!
//! [`SharedMemory`] reproduces the C header's `SharedMemory` struct bit for
//! bit: every field is a 4-byte scalar or an array of them (strings are
//! 256-byte `char` buffers), so the record is 4-byte aligned with no padding
//! and is exactly [`SNAPSHOT_SIZE`] bytes. Enumerations are stored as their raw
//! `u32` so any producer value is representable; typed accessors decode them.

use core::mem::{offset_of, size_of};

use serde::{Deserialize, Serialize};

use super::{SHARED_MEMORY_VERSION, SNAPSHOT_SIZE, SNAPSHOT_WORDS, SnapshotHeader};
use crate::types::{
    CarFlags, CrashState, FixedString, GameState, PerTyre, Sector, SessionState, Terrain,
    TyreFlags, Vec3,
};
use crate::{Result, TelemetryError};

/// One telemetry snapshot, laid out exactly as the producer writes it.
///
/// Field comments give the unit, published range and unset sentinel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharedMemory {
    // Version number
    /// `mVersion`, [`SHARED_MEMORY_VERSION`] for this layout
    pub version: u32,

    // Session type
    /// `mGameState`, see [`GameState`]
    pub game_state: u32,
    /// `mSessionState`, see [`SessionState`]
    pub session_state: u32,

    // Unfiltered input
    /// 0..1
    pub unfiltered_throttle: f32,
    /// 0..1
    pub unfiltered_brake: f32,
    /// -1..1
    pub unfiltered_steering: f32,
    /// 0..1
    pub unfiltered_clutch: f32,

    // One time session
    pub player_name: FixedString,
    pub car_name: FixedString,
    pub car_class_name: FixedString,
    pub track_name: FixedString,

    // Timing and scoring
    /// Seconds, unset -1
    pub best_lap_time: f32,
    /// Seconds, unset 0
    pub last_lap_time: f32,
    /// Seconds, unset 0
    pub current_time: f32,
    /// Seconds, unset -1
    pub best_sector1_time: f32,
    /// Seconds, unset -1
    pub current_sector1_time: f32,
    /// Seconds, unset -1
    pub best_sector2_time: f32,
    /// Seconds, unset -1
    pub current_sector2_time: f32,
    /// Seconds, unset 0
    pub split_time: f32,
    /// Milliseconds, unset -1
    pub event_time_remaining: f32,

    // Race info
    /// Unset 0
    pub laps_in_event: u32,
    /// Unset 0
    pub laps_completed: u32,
    /// Unset 0
    pub current_lap: u32,
    /// 1.., unset 0
    pub current_position: u32,
    /// 1.., unset 0
    pub number_of_cars: u32,
    /// `mCurrentSector`, see [`Sector`]
    pub current_sector: u32,

    // Car state
    pub car_flags: CarFlags,
    /// Celsius, unset 0
    pub oil_temp_celsius: f32,
    /// Kilopascal, unset 0
    pub oil_pressure_kpa: f32,
    /// Celsius, unset 0
    pub water_temp_celsius: f32,
    /// Kilopascal, unset 0
    pub water_pressure_kpa: f32,
    /// Kilopascal, unset 0
    pub fuel_pressure_kpa: f32,
    /// 0..1 of capacity
    pub fuel_level: f32,
    /// Litres, unset 0
    pub fuel_capacity: f32,
    /// Metres per second
    pub speed: f32,
    /// Unset 0
    pub rpm: f32,
    /// Unset 0
    pub max_rpm: f32,
    /// 0..1
    pub brake: f32,
    /// 0..1
    pub throttle: f32,
    /// 0..1
    pub clutch: f32,
    /// -1..1
    pub steering: f32,
    /// -1 reverse, 0 neutral (and unset), 1.. forward gears
    pub gear: i32,

    // Motion and device related
    /// World space
    pub world_position: Vec3,
    /// Euler angles
    pub orientation: Vec3,
    /// Metres per second
    pub local_velocity: Vec3,
    /// Metres per second
    pub world_velocity: Vec3,
    /// Radians per second
    pub angular_velocity: Vec3,
    pub local_acceleration: Vec3,
    pub world_acceleration: Vec3,
    /// Local space
    pub extents_centre: Vec3,

    // Wheels and tyres
    pub tyre_flags: PerTyre<TyreFlags>,
    /// `mTerrain`, see [`Terrain`]
    pub terrain: PerTyre<u32>,
    /// Local space Y
    pub tyre_y: PerTyre<f32>,
    /// Revolutions per second
    pub tyre_rps: PerTyre<f32>,
    /// Metres per second
    pub tyre_slip_speed: PerTyre<f32>,
    /// Celsius, unset 0
    pub tyre_temp: PerTyre<f32>,
    /// 0..1
    pub tyre_grip: PerTyre<f32>,
    /// Local space Y
    pub tyre_height_above_ground: PerTyre<f32>,
    pub tyre_lateral_stiffness: PerTyre<f32>,
    /// 0..1
    pub tyre_wear: PerTyre<f32>,
    /// 0..1
    pub brake_damage: PerTyre<f32>,
    /// 0..1
    pub suspension_damage: PerTyre<f32>,

    // Car damage
    /// `mCrashState`, see [`CrashState`]
    pub crash_state: u32,
    /// 0..1
    pub aero_damage: f32,
    /// 0..1
    pub engine_damage: f32,

    // Weather
    /// Celsius, unset 25
    pub ambient_temperature: f32,
    /// Celsius, unset 30
    pub track_temperature: f32,
    /// 0..1
    pub rain_density: f32,
    /// 0..100, unset 2
    pub wind_speed: f32,
    /// Normalised vector X
    pub wind_direction_x: f32,
    /// Normalised vector Y
    pub wind_direction_y: f32,
    pub cloud_brightness: f32,
}

const _: () = {
    assert!(size_of::<SharedMemory>() == SNAPSHOT_SIZE);
    assert!(size_of::<SharedMemory>() == SNAPSHOT_WORDS * 4);
    assert!(core::mem::align_of::<SharedMemory>() == 4);
    assert!(offset_of!(SharedMemory, version) == 0);
    assert!(offset_of!(SharedMemory, unfiltered_clutch) == 24);
    assert!(offset_of!(SharedMemory, player_name) == 28);
    assert!(offset_of!(SharedMemory, track_name) == 796);
    assert!(offset_of!(SharedMemory, best_lap_time) == 1052);
    assert!(offset_of!(SharedMemory, laps_in_event) == 1088);
    assert!(offset_of!(SharedMemory, car_flags) == 1112);
    assert!(offset_of!(SharedMemory, gear) == 1172);
    assert!(offset_of!(SharedMemory, world_position) == 1176);
    assert!(offset_of!(SharedMemory, tyre_flags) == 1272);
    assert!(offset_of!(SharedMemory, crash_state) == 1464);
    assert!(offset_of!(SharedMemory, cloud_brightness) == 1500);
};

impl Default for SharedMemory {
    /// A freshly initialized record: current version, every field at its
    /// unset sentinel (zero where the header defines none).
    fn default() -> Self {
        Self {
            version: SHARED_MEMORY_VERSION,
            best_lap_time: -1.0,
            best_sector1_time: -1.0,
            current_sector1_time: -1.0,
            best_sector2_time: -1.0,
            current_sector2_time: -1.0,
            event_time_remaining: -1.0,
            ambient_temperature: 25.0,
            track_temperature: 30.0,
            wind_speed: 2.0,
            ..Self::zeroed()
        }
    }
}

impl SharedMemory {
    /// All-zero record, as a freshly mapped segment reads before the producer
    /// writes it. Note `version` is 0, which readers reject.
    pub const fn zeroed() -> Self {
        Self::from_words([0; SNAPSHOT_WORDS])
    }

    /// Reinterpret native-endian words as a record.
    pub const fn from_words(words: [u32; SNAPSHOT_WORDS]) -> Self {
        // SAFETY: the record is `repr(C)`, exactly SNAPSHOT_WORDS words with no
        // padding, and every field accepts any 32-bit pattern.
        unsafe { core::mem::transmute::<[u32; SNAPSHOT_WORDS], SharedMemory>(words) }
    }

    /// The record as native-endian words.
    pub const fn to_words(&self) -> [u32; SNAPSHOT_WORDS] {
        // SAFETY: same layout argument as `from_words`.
        unsafe { core::mem::transmute::<SharedMemory, [u32; SNAPSHOT_WORDS]>(*self) }
    }

    /// The record's bytes in memory order.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: no padding, so every byte of the struct is initialized.
        unsafe {
            core::slice::from_raw_parts((self as *const SharedMemory).cast::<u8>(), SNAPSHOT_SIZE)
        }
    }

    /// Decode a record from raw bytes.
    ///
    /// The version word is checked first; a record of any other version is
    /// rejected without decoding the remaining fields.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = SnapshotHeader::parse(bytes)?;
        header.validate()?;

        if bytes.len() < SNAPSHOT_SIZE {
            return Err(TelemetryError::memory_access_error(bytes.len()));
        }

        // SAFETY: length checked above; unaligned read because `bytes` may
        // come from any buffer.
        Ok(unsafe { core::ptr::read_unaligned(bytes.as_ptr().cast::<SharedMemory>()) })
    }

    /// Whether the record carries the compiled-in version.
    pub const fn is_supported_version(&self) -> bool {
        self.version == SHARED_MEMORY_VERSION
    }

    pub const fn game_state(&self) -> GameState {
        GameState::from_raw(self.game_state)
    }

    pub fn set_game_state(&mut self, state: GameState) {
        self.game_state = state.raw();
    }

    pub const fn session_state(&self) -> SessionState {
        SessionState::from_raw(self.session_state)
    }

    pub fn set_session_state(&mut self, state: SessionState) {
        self.session_state = state.raw();
    }

    pub const fn current_sector(&self) -> Sector {
        Sector::from_raw(self.current_sector)
    }

    pub fn set_current_sector(&mut self, sector: Sector) {
        self.current_sector = sector.raw();
    }

    pub const fn crash_state(&self) -> CrashState {
        CrashState::from_raw(self.crash_state)
    }

    pub fn set_crash_state(&mut self, state: CrashState) {
        self.crash_state = state.raw();
    }

    /// Surface under each wheel.
    pub fn terrain(&self) -> PerTyre<Terrain> {
        self.terrain.map(Terrain::from_raw)
    }

    pub fn set_terrain(&mut self, terrain: PerTyre<Terrain>) {
        self.terrain = terrain.map(Terrain::raw);
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name.set(name);
    }

    pub fn set_car_name(&mut self, name: &str) {
        self.car_name.set(name);
    }

    pub fn set_car_class_name(&mut self, name: &str) {
        self.car_class_name.set(name);
    }

    pub fn set_track_name(&mut self, name: &str) {
        self.track_name.set(name);
    }

    /// Best lap time, `None` until a lap has been completed.
    pub fn best_lap(&self) -> Option<f32> {
        (self.best_lap_time != -1.0).then_some(self.best_lap_time)
    }

    /// Last lap time, `None` until a lap has been completed.
    pub fn last_lap(&self) -> Option<f32> {
        (self.last_lap_time != 0.0).then_some(self.last_lap_time)
    }

    /// Remaining event time in milliseconds, `None` for lap-limited events.
    pub fn event_time_remaining_ms(&self) -> Option<f32> {
        (self.event_time_remaining != -1.0).then_some(self.event_time_remaining)
    }

    /// Race position, `None` when unset.
    pub fn position(&self) -> Option<u32> {
        (self.current_position != 0).then_some(self.current_position)
    }

    /// Engine speed as a fraction of the limiter, `None` when the limit is unset.
    pub fn rpm_fraction(&self) -> Option<f32> {
        (self.max_rpm > 0.0).then(|| self.rpm / self.max_rpm)
    }
}
