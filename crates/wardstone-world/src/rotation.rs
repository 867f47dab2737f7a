//! The four-way rotation event machine.
//!
//! Four interchangeable roamer encounters live in four fixed position
//! slots, split two-and-two across the continents. Defeating one clears
//! its alive bit; when the last bit clears, a long shared cooldown is
//! armed. On expiry a fresh cycle begins: the kind-to-slot assignment is
//! redrawn as a uniformly random permutation and all four come back.
//!
//! The machine holds pure state; persistence and dispatch are the
//! manager's job, driven by the outcome values returned here.

use rand::Rng;

use wardstone_persist::RotationRecord;
use wardstone_types::{PartitionId, RoamerKind};

use crate::config::ROAMER_SLOTS;
use crate::dispatch::{PartitionAction, SummonKind};
use crate::timer::TimedEvent;

/// Alive mask with every kind alive.
const ALL_ALIVE: u8 = 0b1111;

/// Result of recording a defeat notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefeatOutcome {
    /// The kind was already dead; nothing changed (idempotent replay).
    AlreadyDead,
    /// The kind's bit was cleared; others remain alive.
    Recorded,
    /// The kind's bit was cleared and it was the last one: the shared
    /// cooldown is now armed.
    CycleComplete,
}

/// State machine for the rotation event group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationMachine {
    /// Bit per kind; set means alive / not yet defeated this cycle.
    alive_mask: u8,
    /// Kind assigned to each fixed position slot for the current cycle.
    chosen_order: [RoamerKind; 4],
    /// Shared cooldown armed when the last kind falls.
    cooldown: TimedEvent,
}

impl RotationMachine {
    /// Restore the machine from a persisted (or default) record.
    pub const fn from_record(record: &RotationRecord) -> Self {
        Self {
            alive_mask: record.alive_mask,
            chosen_order: record.chosen_order,
            cooldown: TimedEvent::from_remaining(record.cooldown_ms),
        }
    }

    /// Snapshot the machine for persistence.
    pub const fn to_record(&self) -> RotationRecord {
        RotationRecord {
            alive_mask: self.alive_mask,
            cooldown_ms: self.cooldown.remaining_ms(),
            chosen_order: self.chosen_order,
        }
    }

    /// Current alive mask.
    pub const fn alive_mask(&self) -> u8 {
        self.alive_mask
    }

    /// Current kind-to-slot assignment.
    pub const fn chosen_order(&self) -> [RoamerKind; 4] {
        self.chosen_order
    }

    /// Remaining shared cooldown in milliseconds.
    pub const fn cooldown_remaining_ms(&self) -> u64 {
        self.cooldown.remaining_ms()
    }

    /// Whether a kind is still alive this cycle.
    pub const fn is_alive(&self, kind: RoamerKind) -> bool {
        self.alive_mask & kind.bit() != 0
    }

    /// Record a defeat notification for a kind.
    ///
    /// Clearing an already-clear bit is a no-op, so duplicate
    /// notifications cannot double-count. When the mask reaches zero the
    /// cooldown is armed to `cooldown_ms`.
    pub const fn record_defeat(&mut self, kind: RoamerKind, cooldown_ms: u64) -> DefeatOutcome {
        if !self.is_alive(kind) {
            return DefeatOutcome::AlreadyDead;
        }
        self.alive_mask &= !kind.bit();
        if self.alive_mask == 0 {
            self.cooldown.arm(cooldown_ms);
            DefeatOutcome::CycleComplete
        } else {
            DefeatOutcome::Recorded
        }
    }

    /// Advance the shared cooldown; returns `true` on the tick it
    /// expires. The caller then starts a new cycle.
    pub const fn update(&mut self, delta_ms: u64) -> bool {
        self.cooldown.update(delta_ms)
    }

    /// Whether a load-time respawn should start a fresh cycle: every
    /// kind is dead and no cooldown is pending (the never-persisted
    /// default, or a cooldown that lapsed during downtime and fired).
    pub const fn cycle_is_due(&self) -> bool {
        self.alive_mask == 0 && !self.cooldown.is_armed()
    }

    /// Begin a new cycle: redraw the kind-to-slot permutation without
    /// replacement and mark all four alive.
    ///
    /// The draw is a partial Fisher–Yates over a shrinking pool: each
    /// slot takes a uniformly random remaining kind, which yields a
    /// uniformly random permutation.
    pub fn begin_cycle(&mut self, rng: &mut impl Rng) {
        let mut pool = RoamerKind::ALL.to_vec();
        for slot in &mut self.chosen_order {
            let pick = rng.random_range(0..pool.len());
            *slot = pool.remove(pick);
        }
        self.alive_mask = ALL_ALIVE;
    }

    /// The deferred summon actions of a respawn pass: one per slot whose
    /// assigned kind is still alive.
    ///
    /// Safe to re-assert after a restart -- dead kinds are skipped here
    /// and the consumer ignores kinds it already has up.
    pub fn respawn_actions(&self) -> Vec<(PartitionId, PartitionAction)> {
        ROAMER_SLOTS
            .iter()
            .zip(self.chosen_order)
            .filter(|(_, kind)| self.is_alive(*kind))
            .map(|(slot, kind)| {
                (
                    slot.partition,
                    PartitionAction::Summon {
                        kind: SummonKind::Roamer(kind),
                        position: slot.position,
                    },
                )
            })
            .collect()
    }
}

impl Default for RotationMachine {
    /// Fresh-world default: all four dead with no cooldown, so the first
    /// respawn pass starts a cycle immediately.
    fn default() -> Self {
        Self::from_record(&RotationRecord::defaults())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    const COOLDOWN: u64 = 30 * 60 * 60 * 1000;

    fn cycling() -> RotationMachine {
        let mut machine = RotationMachine::default();
        machine.begin_cycle(&mut SmallRng::seed_from_u64(7));
        machine
    }

    #[test]
    fn mask_tracks_the_set_of_distinct_defeats() {
        let mut machine = cycling();
        assert_eq!(machine.alive_mask(), 0b1111);

        assert_eq!(
            machine.record_defeat(RoamerKind::Emberhide, COOLDOWN),
            DefeatOutcome::Recorded
        );
        assert_eq!(machine.alive_mask(), 0b1011);

        // Replayed notification: bit already clear, nothing changes.
        assert_eq!(
            machine.record_defeat(RoamerKind::Emberhide, COOLDOWN),
            DefeatOutcome::AlreadyDead
        );
        assert_eq!(machine.alive_mask(), 0b1011);

        machine.record_defeat(RoamerKind::Veilwing, COOLDOWN);
        machine.record_defeat(RoamerKind::Sablegaze, COOLDOWN);
        assert_eq!(machine.alive_mask(), 0b0010);
    }

    #[test]
    fn last_defeat_completes_the_cycle_and_arms_the_cooldown() {
        let mut machine = cycling();
        for kind in [RoamerKind::Veilwing, RoamerKind::Mournfang, RoamerKind::Emberhide] {
            machine.record_defeat(kind, COOLDOWN);
        }
        assert_eq!(
            machine.record_defeat(RoamerKind::Sablegaze, COOLDOWN),
            DefeatOutcome::CycleComplete
        );
        assert_eq!(machine.alive_mask(), 0);
        assert_eq!(machine.cooldown_remaining_ms(), COOLDOWN);

        // Once zero, the mask stays zero until the cooldown expires.
        assert_eq!(
            machine.record_defeat(RoamerKind::Veilwing, COOLDOWN),
            DefeatOutcome::AlreadyDead
        );
        assert_eq!(machine.alive_mask(), 0);
    }

    #[test]
    fn redraw_is_always_a_permutation() {
        let mut machine = RotationMachine::default();
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            machine.begin_cycle(&mut rng);
            let distinct: BTreeSet<RoamerKind> = machine.chosen_order().into_iter().collect();
            assert_eq!(distinct.len(), 4, "seed {seed} produced a repeat");
        }
    }

    #[test]
    fn redraw_varies_across_seeds() {
        let mut orders = BTreeSet::new();
        for seed in 0..50 {
            let mut machine = RotationMachine::default();
            machine.begin_cycle(&mut SmallRng::seed_from_u64(seed));
            orders.insert(machine.chosen_order());
        }
        assert!(orders.len() > 1, "every seed drew the identical order");
    }

    #[test]
    fn respawn_pass_covers_both_partitions_and_skips_dead_kinds() {
        let mut machine = cycling();
        let actions = machine.respawn_actions();
        assert_eq!(actions.len(), 4);
        let east = actions
            .iter()
            .filter(|(p, _)| *p == PartitionId::East)
            .count();
        assert_eq!(east, 2);

        // Kill whatever holds slot 0: the pass shrinks by one.
        let slot0_kind = machine.chosen_order()[0];
        machine.record_defeat(slot0_kind, COOLDOWN);
        assert_eq!(machine.respawn_actions().len(), 3);
    }

    #[test]
    fn fresh_world_default_is_due_for_a_cycle() {
        let machine = RotationMachine::default();
        assert!(machine.cycle_is_due());
        assert_eq!(machine.alive_mask(), 0);
        assert_eq!(machine.cooldown_remaining_ms(), 0);
        assert!(machine.respawn_actions().is_empty());
    }

    #[test]
    fn cooldown_expiry_fires_once() {
        let mut machine = cycling();
        for kind in RoamerKind::ALL {
            machine.record_defeat(kind, 1000);
        }
        assert!(!machine.update(400));
        assert!(machine.update(600));
        assert!(!machine.update(600));
        assert!(machine.cycle_is_due());
    }
}
