//! Fixed content tables and tunable durations.
//!
//! Positions, zone sets, and condition seeds are content data fixed at
//! compile time; the durations that shape the event machines live in
//! [`EventTuning`] so embedders (and tests) can shorten them without
//! touching the machines.

use serde::{Deserialize, Serialize};
use wardstone_types::{
    AreaId, ConditionId, EffectId, Era, PartitionId, SpawnPosition, ZoneId,
};

/// One hour in milliseconds.
pub const HOUR_MS: u64 = 60 * 60 * 1000;

/// Tunable durations and the configured starting era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTuning {
    /// Shared cooldown armed when the last roamer of a cycle falls.
    pub rotation_cooldown_ms: u64,
    /// Lower bound of the harbinger respawn window (inclusive).
    pub harbinger_respawn_min_ms: u64,
    /// Upper bound of the harbinger respawn window (inclusive).
    pub harbinger_respawn_max_ms: u64,
    /// Duration of the war-chant zone aura once triggered.
    pub war_chant_duration_ms: u64,
    /// Era assumed when no era record has ever been persisted.
    pub initial_era: Era,
}

impl Default for EventTuning {
    fn default() -> Self {
        Self {
            rotation_cooldown_ms: 30 * HOUR_MS,
            harbinger_respawn_min_ms: 4 * HOUR_MS,
            harbinger_respawn_max_ms: 6 * HOUR_MS,
            war_chant_duration_ms: 2 * HOUR_MS,
            initial_era: Era::Frostfall,
        }
    }
}

/// A fixed rotation position slot: where it is and which partition owns
/// the map it spawns on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoamerSlot {
    /// Partition that owns this slot's map.
    pub partition: PartitionId,
    /// Spawn position within that map.
    pub position: SpawnPosition,
}

/// The four fixed rotation position slots, statically split two-and-two
/// across the continents.
pub const ROAMER_SLOTS: [RoamerSlot; 4] = [
    RoamerSlot {
        partition: PartitionId::East,
        position: SpawnPosition::new(-10428.8, -392.2, 43.7, 0.93),
    },
    RoamerSlot {
        partition: PartitionId::East,
        position: SpawnPosition::new(753.6, -4012.0, 94.0, 3.19),
    },
    RoamerSlot {
        partition: PartitionId::West,
        position: SpawnPosition::new(-2872.7, 1884.3, 52.7, 2.65),
    },
    RoamerSlot {
        partition: PartitionId::West,
        position: SpawnPosition::new(3301.1, -3732.6, 173.5, 2.91),
    },
];

/// The harbinger's full position table.
pub const HARBINGER_POSITIONS: [SpawnPosition; 10] = [
    SpawnPosition::new(1975.5, -137.4, 32.5, 1.21),
    SpawnPosition::new(-9550.1, -126.7, 57.5, 1.35),
    SpawnPosition::new(-5319.1, -482.1, 388.3, 5.83),
    SpawnPosition::new(-14737.6, 499.6, 3.5, 5.46),
    SpawnPosition::new(-234.5, -2585.4, 119.9, 4.77),
    SpawnPosition::new(2197.3, -4684.2, 76.0, 0.94),
    SpawnPosition::new(-6668.7, -1533.1, 243.2, 2.00),
    SpawnPosition::new(912.5, -4502.0, 7.3, 0.26),
    SpawnPosition::new(2785.4, -3823.5, 84.3, 4.51),
    SpawnPosition::new(6443.2, -3904.9, 668.4, 0.94),
];

/// Last position index owned by the eastern partition; higher indices
/// belong to the west.
pub const HARBINGER_EAST_MAX_INDEX: u8 = 6;

/// Partition owning a harbinger position index.
pub const fn harbinger_partition(index: u8) -> PartitionId {
    if index <= HARBINGER_EAST_MAX_INDEX {
        PartitionId::East
    } else {
        PartitionId::West
    }
}

/// Spawn position for a harbinger position index.
///
/// Indices are validated when records load, so an out-of-table index can
/// only come from a code bug; it falls back to the first table entry
/// rather than panicking.
pub fn harbinger_position(index: u8) -> SpawnPosition {
    HARBINGER_POSITIONS
        .get(usize::from(index))
        .copied()
        .unwrap_or(SpawnPosition::new(1975.5, -137.4, 32.5, 1.21))
}

// =========================================================================
// Zone and area sets
// =========================================================================

/// Capital city zones whose occupants receive festival counter updates.
pub const CAPITAL_ZONES: [ZoneId; 6] = [
    ZoneId::new(101),
    ZoneId::new(102),
    ZoneId::new(103),
    ZoneId::new(201),
    ZoneId::new(202),
    ZoneId::new(203),
];

/// Frontier zones affected by the faction banner trophies.
pub const FRONTIER_ZONES: [ZoneId; 6] = [
    ZoneId::new(301),
    ZoneId::new(302),
    ZoneId::new(303),
    ZoneId::new(304),
    ZoneId::new(305),
    ZoneId::new(306),
];

/// Sanctum zones affected by the war-chant aura.
pub const SANCTUM_ZONES: [ZoneId; 4] = [
    ZoneId::new(401),
    ZoneId::new(402),
    ZoneId::new(403),
    ZoneId::new(404),
];

/// Areas whose occupants are tracked for scripted callbacks.
pub const TRACKED_AREAS: [AreaId; 4] = [
    AreaId::new(501),
    AreaId::new(502),
    AreaId::new(503),
    AreaId::new(504),
];

/// Whether a zone is one of the festival capital zones.
pub fn is_capital_zone(zone: ZoneId) -> bool {
    CAPITAL_ZONES.contains(&zone)
}

/// Whether a zone is one of the banner frontier zones.
pub fn is_frontier_zone(zone: ZoneId) -> bool {
    FRONTIER_ZONES.contains(&zone)
}

/// Whether a zone is one of the war-chant sanctum zones.
pub fn is_sanctum_zone(zone: ZoneId) -> bool {
    SANCTUM_ZONES.contains(&zone)
}

/// Whether an area's occupants are tracked.
pub fn is_tracked_area(area: AreaId) -> bool {
    TRACKED_AREAS.contains(&area)
}

// =========================================================================
// Effects and conditions
// =========================================================================

/// Buff granted to Dawn members while the Dawn banner trophy is raised.
pub const EFFECT_DAWN_BANNER: EffectId = EffectId::new(39911);

/// Buff granted to Dusk members while the Dusk banner trophy is raised.
pub const EFFECT_DUSK_BANNER: EffectId = EffectId::new(39913);

/// Aura granted to sanctum occupants while the war chant is active.
pub const EFFECT_WAR_CHANT: EffectId = EffectId::new(39953);

/// The ferry puzzle condition families and their initial step codes.
///
/// Each ferry route walks a four-step cycle (states 1..=4); all three
/// start at step 1 on a fresh world.
pub const FERRY_CONDITION_SEEDS: [(ConditionId, u32); 3] = [
    (ConditionId::new(611), 1),
    (ConditionId::new(612), 1),
    (ConditionId::new(613), 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roamer_slots_split_evenly_across_partitions() {
        let east = ROAMER_SLOTS
            .iter()
            .filter(|s| s.partition == PartitionId::East)
            .count();
        assert_eq!(east, 2);
    }

    #[test]
    fn harbinger_threshold_splits_the_table() {
        assert_eq!(harbinger_partition(0), PartitionId::East);
        assert_eq!(harbinger_partition(6), PartitionId::East);
        assert_eq!(harbinger_partition(7), PartitionId::West);
        assert_eq!(harbinger_partition(9), PartitionId::West);
    }

    #[test]
    fn zone_sets_do_not_overlap() {
        for zone in CAPITAL_ZONES {
            assert!(!is_frontier_zone(zone));
            assert!(!is_sanctum_zone(zone));
        }
        for zone in FRONTIER_ZONES {
            assert!(!is_sanctum_zone(zone));
        }
    }
}
