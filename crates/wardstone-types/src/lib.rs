//! Shared type definitions for the Wardstone world-event manager.
//!
//! This crate is the single source of truth for the identifiers and
//! closed enumerations used across the Wardstone workspace. Keeping them
//! in one leaf crate lets the persistence layer and the world manager
//! agree on wire-stable numeric encodings without depending on each
//! other.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers (entity handles, zones,
//!   areas, conditions, world states, effects)
//! - [`enums`] -- Closed enumerations (encounter kinds, factions,
//!   partitions, save ids, eras)
//! - [`spawn`] -- Spawn position geometry

pub mod enums;
pub mod ids;
pub mod spawn;

// Re-export all public types at crate root for convenience.
pub use enums::{CalendarEvent, Era, Faction, FestivalLeader, PartitionId, RoamerKind, SaveId};
pub use ids::{AreaId, ConditionId, EffectId, EntityHandle, WorldStateId, ZoneId};
pub use spawn::SpawnPosition;
