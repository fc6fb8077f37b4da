//! Game and session phase enumerations (header types #1 and #2)

use super::discriminant::discriminant_enum;

discriminant_enum! {
    /// Game state, stored in `mGameState`.
    pub enum GameState {
        Exited = 0 => "GAME_EXITED",
        FrontEnd = 1 => "GAME_FRONT_END",
        InGamePlaying = 2 => "GAME_INGAME_PLAYING",
        InGamePaused = 3 => "GAME_INGAME_PAUSED",
    }
}

discriminant_enum! {
    /// Session state, stored in `mSessionState`.
    pub enum SessionState {
        Invalid = 0 => "SESSION_INVALID",
        Practice = 1 => "SESSION_PRACTICE",
        Test = 2 => "SESSION_TEST",
        Qualify = 3 => "SESSION_QUALIFY",
        Race = 4 => "SESSION_RACE",
        TimeAttack = 5 => "SESSION_TIME_ATTACK",
    }
}

impl GameState {
    /// True while the player is in a loaded session, paused or not.
    pub fn is_in_game(self) -> bool {
        matches!(self, GameState::InGamePlaying | GameState::InGamePaused)
    }
}
