//! The harbinger single-spawn event machine.
//!
//! One encounter instance roams the world at a time. On defeat, a
//! respawn timer is armed to a uniformly random duration within a fixed
//! window; on expiry, a new position is drawn uniformly from the full
//! table and the harbinger comes back wherever that is. A fixed index
//! threshold decides which partition owns the spawn.
//!
//! Like [`RotationMachine`](crate::rotation::RotationMachine), this type
//! holds pure state; the manager persists and dispatches based on what
//! it returns.

use rand::Rng;
use tracing::warn;

use wardstone_persist::HarbingerRecord;
use wardstone_types::PartitionId;

use crate::config::{HARBINGER_POSITIONS, harbinger_partition, harbinger_position};
use crate::dispatch::{PartitionAction, SummonKind};
use crate::timer::TimedEvent;

/// State machine for the harbinger single-spawn event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarbingerMachine {
    /// Whether the harbinger is currently up.
    spawned: bool,
    /// Index of the current/last chosen position.
    position: u8,
    /// Respawn countdown armed on defeat.
    respawn: TimedEvent,
}

impl HarbingerMachine {
    /// Restore the machine from a persisted (or default) record.
    ///
    /// A record whose position index falls outside the fixed table can
    /// only come from corrupted storage; it degrades to defaults.
    pub fn from_record(record: &HarbingerRecord) -> Self {
        let record = if usize::from(record.position) < HARBINGER_POSITIONS.len() {
            *record
        } else {
            warn!(
                position = record.position,
                "harbinger record position out of table, resetting to defaults"
            );
            HarbingerRecord::defaults()
        };
        Self {
            spawned: record.spawned,
            position: record.position,
            respawn: TimedEvent::from_remaining(record.respawn_ms),
        }
    }

    /// Snapshot the machine for persistence.
    pub const fn to_record(&self) -> HarbingerRecord {
        HarbingerRecord {
            spawned: self.spawned,
            position: self.position,
            respawn_ms: self.respawn.remaining_ms(),
        }
    }

    /// Whether the harbinger is currently up.
    pub const fn is_spawned(&self) -> bool {
        self.spawned
    }

    /// Index of the current/last chosen position.
    pub const fn position(&self) -> u8 {
        self.position
    }

    /// Remaining respawn countdown in milliseconds.
    pub const fn respawn_remaining_ms(&self) -> u64 {
        self.respawn.remaining_ms()
    }

    /// Record the harbinger's defeat: arm the respawn timer to a uniform
    /// random duration in `[min_ms, max_ms]` and return the drawn value.
    pub fn record_defeat(&mut self, rng: &mut impl Rng, min_ms: u64, max_ms: u64) -> u64 {
        self.spawned = false;
        let duration = rng.random_range(min_ms..=max_ms);
        self.respawn.arm(duration);
        duration
    }

    /// Advance the respawn timer; returns `true` on the tick it expires.
    pub const fn update(&mut self, delta_ms: u64) -> bool {
        self.respawn.update(delta_ms)
    }

    /// Assert the harbinger's presence, drawing a fresh position first
    /// if it is not currently up.
    ///
    /// Returns whether durable state changed (the caller persists) and
    /// the summon action for the partition owning the chosen index. Used
    /// both on timer expiry and for the era-forced startup pass, which
    /// re-asserts an already-chosen position without redrawing.
    pub fn assert_spawn(
        &mut self,
        rng: &mut impl Rng,
    ) -> (bool, (PartitionId, PartitionAction)) {
        let changed = if self.spawned {
            false
        } else {
            let table_len = u8::try_from(HARBINGER_POSITIONS.len()).unwrap_or(u8::MAX);
            self.position = rng.random_range(0..table_len);
            self.spawned = true;
            true
        };
        let action = PartitionAction::Summon {
            kind: SummonKind::Harbinger,
            position: harbinger_position(self.position),
        };
        (changed, (harbinger_partition(self.position), action))
    }
}

impl Default for HarbingerMachine {
    /// Fresh-world default: not spawned, no respawn pending. The first
    /// occurrence is forced by era gating, not by this machine.
    fn default() -> Self {
        Self::from_record(&HarbingerRecord::defaults())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::HARBINGER_EAST_MAX_INDEX;

    const MIN: u64 = 4 * 60 * 60 * 1000;
    const MAX: u64 = 6 * 60 * 60 * 1000;

    #[test]
    fn defeat_arms_a_timer_within_the_window() {
        let mut machine = HarbingerMachine::default();
        for seed in 0..100 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let duration = machine.record_defeat(&mut rng, MIN, MAX);
            assert!((MIN..=MAX).contains(&duration), "seed {seed}: {duration}");
            assert!(!machine.is_spawned());
        }
    }

    #[test]
    fn defeat_then_expiry_respawns_at_a_valid_position() {
        let mut machine = HarbingerMachine::default();
        let mut rng = SmallRng::seed_from_u64(11);

        let duration = machine.record_defeat(&mut rng, MIN, MAX);
        assert!(machine.update(duration));

        let (changed, (partition, action)) = machine.assert_spawn(&mut rng);
        assert!(changed);
        assert!(machine.is_spawned());

        let index = machine.position();
        assert!(usize::from(index) < HARBINGER_POSITIONS.len());
        let expected = if index <= HARBINGER_EAST_MAX_INDEX {
            PartitionId::East
        } else {
            PartitionId::West
        };
        assert_eq!(partition, expected);
        assert!(matches!(
            action,
            PartitionAction::Summon {
                kind: SummonKind::Harbinger,
                ..
            }
        ));
    }

    #[test]
    fn asserting_an_up_harbinger_keeps_its_position() {
        let mut machine = HarbingerMachine::default();
        let mut rng = SmallRng::seed_from_u64(3);

        let (changed, _) = machine.assert_spawn(&mut rng);
        assert!(changed);
        let chosen = machine.position();

        // Re-assertion after a restart must not redraw or re-persist.
        let (changed, (partition, _)) = machine.assert_spawn(&mut rng);
        assert!(!changed);
        assert_eq!(machine.position(), chosen);
        assert_eq!(partition, harbinger_partition(chosen));
    }

    #[test]
    fn positions_cover_both_partitions_over_many_draws() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut east = false;
        let mut west = false;
        for _ in 0..200 {
            let mut machine = HarbingerMachine::default();
            machine.assert_spawn(&mut rng);
            match harbinger_partition(machine.position()) {
                PartitionId::East => east = true,
                PartitionId::West => west = true,
            }
        }
        assert!(east && west);
    }

    #[test]
    fn out_of_table_record_degrades_to_defaults() {
        let record = HarbingerRecord {
            spawned: true,
            position: 200,
            respawn_ms: 5,
        };
        let machine = HarbingerMachine::from_record(&record);
        assert_eq!(machine.to_record(), HarbingerRecord::defaults());
    }
}
