//! Terrain material enumeration (header type #3)

use super::discriminant::discriminant_enum;

discriminant_enum! {
    /// Surface under a tyre, stored per wheel in `mTerrain`.
    pub enum Terrain {
        Road = 0 => "TERRAIN_ROAD",
        LowGripRoad = 1 => "TERRAIN_LOW_GRIP_ROAD",
        BumpyRoad1 = 2 => "TERRAIN_BUMPY_ROAD1",
        BumpyRoad2 = 3 => "TERRAIN_BUMPY_ROAD2",
        BumpyRoad3 = 4 => "TERRAIN_BUMPY_ROAD3",
        Marbles = 5 => "TERRAIN_MARBLES",
        GrassyBerms = 6 => "TERRAIN_GRASSY_BERMS",
        Grass = 7 => "TERRAIN_GRASS",
        Gravel = 8 => "TERRAIN_GRAVEL",
        BumpyGravel = 9 => "TERRAIN_BUMPY_GRAVEL",
        RumbleStrips = 10 => "TERRAIN_RUMBLE_STRIPS",
        Drains = 11 => "TERRAIN_DRAINS",
        Tyrewalls = 12 => "TERRAIN_TYREWALLS",
        Cementwalls = 13 => "TERRAIN_CEMENTWALLS",
        Guardrails = 14 => "TERRAIN_GUARDRAILS",
        Sand = 15 => "TERRAIN_SAND",
        BumpySand = 16 => "TERRAIN_BUMPY_SAND",
        Dirt = 17 => "TERRAIN_DIRT",
        BumpyDirt = 18 => "TERRAIN_BUMPY_DIRT",
        DirtRoad = 19 => "TERRAIN_DIRT_ROAD",
        BumpyDirtRoad = 20 => "TERRAIN_BUMPY_DIRT_ROAD",
        Pavement = 21 => "TERRAIN_PAVEMENT",
        DirtBank = 22 => "TERRAIN_DIRT_BANK",
        Wood = 23 => "TERRAIN_WOOD",
        DryVerge = 24 => "TERRAIN_DRY_VERGE",
        ExitRumbleStrips = 25 => "TERRAIN_EXIT_RUMBLE_STRIPS",
        Grasscrete = 26 => "TERRAIN_GRASSCRETE",
        LongGrass = 27 => "TERRAIN_LONG_GRASS",
        SlopeGrass = 28 => "TERRAIN_SLOPE_GRASS",
        Cobbles = 29 => "TERRAIN_COBBLES",
        SandRoad = 30 => "TERRAIN_SAND_ROAD",
        BakedClay = 31 => "TERRAIN_BAKED_CLAY",
        Astroturf = 32 => "TERRAIN_ASTROTURF",
        SnowHalf = 33 => "TERRAIN_SNOWHALF",
        SnowFull = 34 => "TERRAIN_SNOWFULL",
    }
}

impl Terrain {
    /// Paved surfaces a car is expected to drive on at race pace.
    pub fn is_paved(self) -> bool {
        matches!(
            self,
            Terrain::Road
                | Terrain::LowGripRoad
                | Terrain::BumpyRoad1
                | Terrain::BumpyRoad2
                | Terrain::BumpyRoad3
                | Terrain::Marbles
                | Terrain::RumbleStrips
                | Terrain::ExitRumbleStrips
                | Terrain::Pavement
                | Terrain::Cobbles
        )
    }
}
