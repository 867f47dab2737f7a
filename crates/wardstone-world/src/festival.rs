//! Festival holiday counters and their broadcast mapping.
//!
//! Each of the six faction leaders owns a monotonically increasing token
//! counter; clients additionally see a derived per-faction total. The
//! counters themselves live here as pure state -- the manager persists
//! them and fans the update pairs out to the capital-zone audience.

use wardstone_persist::FestivalRecord;
use wardstone_types::{Faction, FestivalLeader, WorldStateId};

/// World-state id broadcast for a leader's own counter.
pub const fn leader_world_state(leader: FestivalLeader) -> WorldStateId {
    match leader {
        FestivalLeader::Castellan => WorldStateId::new(2201),
        FestivalLeader::Hierophant => WorldStateId::new(2202),
        FestivalLeader::Forgelord => WorldStateId::new(2203),
        FestivalLeader::Warbringer => WorldStateId::new(2204),
        FestivalLeader::Earthspeaker => WorldStateId::new(2205),
        FestivalLeader::Ravenqueen => WorldStateId::new(2206),
    }
}

/// World-state id broadcast for a faction's aggregate total.
pub const fn faction_total_world_state(faction: Faction) -> WorldStateId {
    match faction {
        Faction::Dawn => WorldStateId::new(2211),
        Faction::Dusk => WorldStateId::new(2212),
    }
}

/// The six festival leader counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FestivalCounters {
    /// Counter per leader, in leader-slot order.
    counters: [u32; 6],
}

impl FestivalCounters {
    /// Restore counters from a persisted (or default) record.
    pub const fn from_record(record: &FestivalRecord) -> Self {
        Self {
            counters: record.counters,
        }
    }

    /// Snapshot the counters for persistence.
    pub const fn to_record(&self) -> FestivalRecord {
        FestivalRecord {
            counters: self.counters,
        }
    }

    /// Current counter of one leader.
    pub fn counter(&self, leader: FestivalLeader) -> u32 {
        self.counters.get(leader.index()).copied().unwrap_or(0)
    }

    /// Bump a leader's counter; saturates rather than wrapping.
    ///
    /// Returns the new value.
    pub fn increment(&mut self, leader: FestivalLeader) -> u32 {
        match self.counters.get_mut(leader.index()) {
            Some(slot) => {
                *slot = slot.saturating_add(1);
                *slot
            }
            None => 0,
        }
    }

    /// Derived aggregate: sum of the three counters of one faction.
    pub fn faction_total(&self, faction: Faction) -> u32 {
        FestivalLeader::ALL
            .iter()
            .filter(|leader| leader.faction() == faction)
            .fold(0u32, |acc, leader| {
                acc.saturating_add(self.counter(*leader))
            })
    }

    /// The two `(world state, value)` pairs to broadcast after a bump:
    /// the leader's own counter plus its faction total.
    pub fn broadcast_pairs(&self, leader: FestivalLeader) -> [(WorldStateId, u32); 2] {
        let faction = leader.faction();
        [
            (leader_world_state(leader), self.counter(leader)),
            (
                faction_total_world_state(faction),
                self.faction_total(faction),
            ),
        ]
    }

    /// The full batched fill for a client joining a capital zone: every
    /// leader counter plus both faction totals.
    pub fn initial_fill(&self) -> Vec<(WorldStateId, u32)> {
        let mut pairs = Vec::with_capacity(8);
        for leader in FestivalLeader::ALL {
            pairs.push((leader_world_state(leader), self.counter(leader)));
        }
        for faction in [Faction::Dawn, Faction::Dusk] {
            pairs.push((
                faction_total_world_state(faction),
                self.faction_total(faction),
            ));
        }
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn increments_count_exactly_and_only_for_their_leader() {
        let mut counters = FestivalCounters::default();
        for _ in 0..5 {
            counters.increment(FestivalLeader::Warbringer);
        }
        counters.increment(FestivalLeader::Castellan);

        assert_eq!(counters.counter(FestivalLeader::Warbringer), 5);
        assert_eq!(counters.counter(FestivalLeader::Castellan), 1);
        assert_eq!(counters.counter(FestivalLeader::Ravenqueen), 0);
    }

    #[test]
    fn faction_totals_sum_exactly_three_leaders_regardless_of_interleaving() {
        let mut counters = FestivalCounters::default();
        // Interleave bumps across both factions.
        let sequence = [
            FestivalLeader::Castellan,
            FestivalLeader::Warbringer,
            FestivalLeader::Hierophant,
            FestivalLeader::Earthspeaker,
            FestivalLeader::Castellan,
            FestivalLeader::Ravenqueen,
            FestivalLeader::Forgelord,
            FestivalLeader::Warbringer,
        ];
        for leader in sequence {
            counters.increment(leader);
        }

        assert_eq!(counters.faction_total(Faction::Dawn), 4);
        assert_eq!(counters.faction_total(Faction::Dusk), 4);
    }

    #[test]
    fn broadcast_pairs_carry_leader_and_faction_values() {
        let mut counters = FestivalCounters::default();
        counters.increment(FestivalLeader::Hierophant);
        counters.increment(FestivalLeader::Forgelord);

        let pairs = counters.broadcast_pairs(FestivalLeader::Hierophant);
        assert_eq!(pairs[0], (leader_world_state(FestivalLeader::Hierophant), 1));
        assert_eq!(pairs[1], (faction_total_world_state(Faction::Dawn), 2));
    }

    #[test]
    fn initial_fill_covers_all_eight_states() {
        let counters = FestivalCounters::default();
        let fill = counters.initial_fill();
        assert_eq!(fill.len(), 8);
        let distinct: std::collections::BTreeSet<WorldStateId> =
            fill.iter().map(|(id, _)| *id).collect();
        assert_eq!(distinct.len(), 8);
    }

    #[test]
    fn counters_survive_a_record_round_trip() {
        let mut counters = FestivalCounters::default();
        counters.increment(FestivalLeader::Ravenqueen);
        counters.increment(FestivalLeader::Ravenqueen);
        let restored = FestivalCounters::from_record(&counters.to_record());
        assert_eq!(restored, counters);
    }
}
