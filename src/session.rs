//! Session identity derived from the record

use serde::{Deserialize, Serialize};

use crate::schema::SharedMemory;
use crate::types::{GameState, SessionState};

/// What the simulator is running, as opposed to what the car is doing.
///
/// A new value is published whenever the game state, session state or any of
/// the four identity strings changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SessionInfo {
    pub game_state: GameState,
    pub session_state: SessionState,
    pub player_name: String,
    pub car_name: String,
    pub car_class_name: String,
    pub track_name: String,
    /// Sequence number of the snapshot the change was seen in
    pub first_seen_sequence: u64,
}

impl SessionInfo {
    pub fn from_snapshot(record: &SharedMemory, sequence: u64) -> Self {
        Self {
            game_state: record.game_state(),
            session_state: record.session_state(),
            player_name: record.player_name.to_string_lossy().into_owned(),
            car_name: record.car_name.to_string_lossy().into_owned(),
            car_class_name: record.car_class_name.to_string_lossy().into_owned(),
            track_name: record.track_name.to_string_lossy().into_owned(),
            first_seen_sequence: sequence,
        }
    }

    /// Whether `record` still belongs to this session.
    ///
    /// Names are compared in their decoded form, so a name that is not valid
    /// UTF-8 still matches the session built from it.
    pub fn matches(&self, record: &SharedMemory) -> bool {
        self.game_state == record.game_state()
            && self.session_state == record.session_state()
            && self.player_name == record.player_name.to_string_lossy()
            && self.car_name == record.car_name.to_string_lossy()
            && self.car_class_name == record.car_class_name.to_string_lossy()
            && self.track_name == record.track_name.to_string_lossy()
    }

    /// True while a session is loaded and the player is on track or paused.
    pub fn is_active(&self) -> bool {
        self.game_state.is_in_game()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FixedString, STRING_LENGTH_MAX};

    #[test]
    fn matches_ignores_driving_state() {
        let mut record = SharedMemory::default();
        record.set_track_name("Silverstone");
        let session = SessionInfo::from_snapshot(&record, 7);

        record.speed = 80.0;
        record.current_lap = 4;
        assert!(session.matches(&record));
        assert_eq!(session.first_seen_sequence, 7);
    }

    #[test]
    fn identity_or_state_change_is_a_new_session() {
        let mut record = SharedMemory::default();
        record.set_session_state(SessionState::Qualify);
        let session = SessionInfo::from_snapshot(&record, 1);

        let mut moved_on = record;
        moved_on.set_session_state(SessionState::Race);
        assert!(!session.matches(&moved_on));

        let mut other_car = record;
        other_car.set_car_name("Kart 125");
        assert!(!session.matches(&other_car));
    }

    fn raw_name(bytes: &[u8]) -> FixedString {
        let mut raw = [0u8; STRING_LENGTH_MAX];
        raw[..bytes.len()].copy_from_slice(bytes);
        FixedString::from_raw(raw)
    }

    #[test]
    fn latin1_track_name_matches_its_own_session() {
        let mut record = SharedMemory::default();
        record.track_name = raw_name(b"N\xFCrburgring");

        let session = SessionInfo::from_snapshot(&record, 1);
        assert_eq!(session.track_name, "N\u{FFFD}rburgring");
        assert!(session.matches(&record));

        record.track_name = raw_name(&[b'A', 0xE9, b'B']);
        assert!(!session.matches(&record));
        assert!(SessionInfo::from_snapshot(&record, 2).matches(&record));
    }
}
