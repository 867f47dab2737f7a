//! Closed enumerations shared across the Wardstone workspace.
//!
//! Every enum here has a stable numeric encoding (used in persisted
//! payloads) exposed through `index`/`try_from_index` pairs rather than
//! `as` casts, so the wire values cannot drift when variants are
//! reordered.

use serde::{Deserialize, Serialize};

/// The four interchangeable roamer encounters of the rotation event.
///
/// All four must be defeated before the shared cooldown begins; on
/// expiry the group respawns with a freshly drawn kind-to-slot
/// permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoamerKind {
    /// The roamer seeded into slot 0 in the canonical order.
    Veilwing,
    /// The roamer seeded into slot 1 in the canonical order.
    Mournfang,
    /// The roamer seeded into slot 2 in the canonical order.
    Emberhide,
    /// The roamer seeded into slot 3 in the canonical order.
    Sablegaze,
}

impl RoamerKind {
    /// All four kinds in canonical order.
    pub const ALL: [Self; 4] = [
        Self::Veilwing,
        Self::Mournfang,
        Self::Emberhide,
        Self::Sablegaze,
    ];

    /// Stable numeric index of this kind (0..4).
    pub const fn index(self) -> u8 {
        match self {
            Self::Veilwing => 0,
            Self::Mournfang => 1,
            Self::Emberhide => 2,
            Self::Sablegaze => 3,
        }
    }

    /// The alive-mask bit for this kind.
    pub const fn bit(self) -> u8 {
        1 << self.index()
    }

    /// Look a kind up by its stable index.
    pub const fn try_from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Veilwing),
            1 => Some(Self::Mournfang),
            2 => Some(Self::Emberhide),
            3 => Some(Self::Sablegaze),
            _ => None,
        }
    }
}

/// One of the two opposing player factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The Dawn accord.
    Dawn,
    /// The Dusk covenant.
    Dusk,
}

/// The six faction representatives honored during the festival holiday.
///
/// Each leader owns one monotonically increasing counter; the first
/// three belong to [`Faction::Dawn`], the last three to
/// [`Faction::Dusk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FestivalLeader {
    /// Dawn's castellan.
    Castellan,
    /// Dawn's hierophant.
    Hierophant,
    /// Dawn's forgelord.
    Forgelord,
    /// Dusk's warbringer.
    Warbringer,
    /// Dusk's earthspeaker.
    Earthspeaker,
    /// Dusk's raven queen.
    Ravenqueen,
}

impl FestivalLeader {
    /// All six leaders in counter-slot order.
    pub const ALL: [Self; 6] = [
        Self::Castellan,
        Self::Hierophant,
        Self::Forgelord,
        Self::Warbringer,
        Self::Earthspeaker,
        Self::Ravenqueen,
    ];

    /// Stable counter-slot index of this leader (0..6).
    pub const fn index(self) -> usize {
        match self {
            Self::Castellan => 0,
            Self::Hierophant => 1,
            Self::Forgelord => 2,
            Self::Warbringer => 3,
            Self::Earthspeaker => 4,
            Self::Ravenqueen => 5,
        }
    }

    /// The faction this leader represents.
    pub const fn faction(self) -> Faction {
        match self {
            Self::Castellan | Self::Hierophant | Self::Forgelord => Faction::Dawn,
            Self::Warbringer | Self::Earthspeaker | Self::Ravenqueen => Faction::Dusk,
        }
    }
}

/// An independently-threaded slice of the simulated world.
///
/// Each partition has single-writer semantics for the entities it owns:
/// foreign threads must never mutate a partition's live objects directly
/// and instead enqueue deferred actions onto its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PartitionId {
    /// The eastern continent partition.
    East,
    /// The western continent partition.
    West,
}

/// Reserved identifiers for persisted records.
///
/// Each id maps to at most one row in the backing store; the numeric
/// values are wire-stable and must never be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SaveId {
    /// Rotation event group state (mask, cooldown, chosen order).
    Rotation,
    /// Harbinger single-spawn state (spawned flag, position, respawn).
    Harbinger,
    /// Festival leader counters.
    Festival,
    /// Ferry transport puzzle-condition states.
    Transport,
    /// Current world era.
    Era,
}

impl SaveId {
    /// Every reserved save id, in loading order.
    pub const ALL: [Self; 5] = [
        Self::Rotation,
        Self::Harbinger,
        Self::Festival,
        Self::Transport,
        Self::Era,
    ];

    /// Stable numeric row key for this record.
    pub const fn row_key(self) -> u32 {
        match self {
            Self::Rotation => 1,
            Self::Harbinger => 2,
            Self::Festival => 3,
            Self::Transport => 4,
            Self::Era => 5,
        }
    }

    /// Look a save id up by its stable row key.
    pub const fn try_from_row_key(key: u32) -> Option<Self> {
        match key {
            1 => Some(Self::Rotation),
            2 => Some(Self::Harbinger),
            3 => Some(Self::Festival),
            4 => Some(Self::Transport),
            5 => Some(Self::Era),
            _ => None,
        }
    }
}

/// The world's release era, gating which calendar events run and whether
/// the harbinger's first occurrence is forced at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Era {
    /// Pre-opening era: the gathering-storm event runs and the harbinger
    /// invasion is forced on a fresh world.
    Founding,
    /// First expansion era: the echoes-below event runs.
    Riftwar,
    /// Second expansion era: no transition event is active.
    Frostfall,
}

impl Era {
    /// Stable numeric encoding of this era.
    pub const fn index(self) -> u8 {
        match self {
            Self::Founding => 0,
            Self::Riftwar => 1,
            Self::Frostfall => 2,
        }
    }

    /// Look an era up by its stable encoding.
    pub const fn try_from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Founding),
            1 => Some(Self::Riftwar),
            2 => Some(Self::Frostfall),
            _ => None,
        }
    }
}

/// Calendar-driven transition events toggled by era changes.
///
/// Activation logic lives in the external event calendar; the manager
/// only tells it which event should be running for the current era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CalendarEvent {
    /// Pre-opening world event active during [`Era::Founding`].
    GatheringStorm,
    /// Expansion-transition event active during [`Era::Riftwar`].
    EchoesBelow,
}
