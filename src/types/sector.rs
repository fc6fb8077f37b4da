//! Current sector enumeration (header type #5)

use super::discriminant::discriminant_enum;

discriminant_enum! {
    /// Lap sector the player car is in, stored in `mCurrentSector`.
    pub enum Sector {
        Invalid = 0 => "SECTOR_INVALID",
        Start = 1 => "SECTOR_START",
        Sector1 = 2 => "SECTOR_SECTOR1",
        Sector2 = 3 => "SECTOR_SECTOR2",
        Finish = 4 => "SECTOR_FINISH",
        Stop = 5 => "SECTOR_STOP",
    }
}
