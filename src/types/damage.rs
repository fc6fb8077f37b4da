//! Crash damage state enumeration (header type #4)

use super::discriminant::discriminant_enum;

discriminant_enum! {
    /// Crash state, stored in `mCrashState`.
    pub enum CrashState {
        None = 0 => "CRASH_DAMAGE_NONE",
        OffTrack = 1 => "CRASH_DAMAGE_OFFTRACK",
        LargeProp = 2 => "CRASH_DAMAGE_LARGE_PROP",
        Spinning = 3 => "CRASH_DAMAGE_SPINNING",
        Rolling = 4 => "CRASH_DAMAGE_ROLLING",
    }
}
