//! Persistent, thread-safe world-event state manager.
//!
//! Wardstone tracks the recurring global encounters of a sharded
//! simulation server: the four-way roamer rotation, the harbinger
//! single-spawn invasion, ferry puzzle conditions, the festival holiday
//! counters, and the timed or toggled zone-wide buffs that go with them.
//! It decides *when* and *on whom* world-level effects occur, records a
//! minimal durable snapshot of each decision, and defers every
//! cross-partition mutation onto the owning partition's queue.
//!
//! # Threading model
//!
//! One dedicated tick thread drives [`WorldStateManager::update`] at a
//! fixed cadence while any number of connection-handling threads call
//! the mutators concurrently. Mutable state is split into two
//! independent locking domains (encounters vs festival) so unrelated
//! subsystems never contend, and no lock is ever held while a deferred
//! action body runs -- actions execute later on their partition's own
//! thread.
//!
//! # Modules
//!
//! - [`timer`] -- countdown events advanced once per tick
//! - [`membership`] -- per-audience entity handle registries
//! - [`dispatch`] -- deferred cross-partition action messages
//! - [`rotation`] -- the four-way rotation event machine
//! - [`single_spawn`] -- the harbinger single-spawn event machine
//! - [`conditions`] -- the puzzle condition flag store
//! - [`festival`] -- holiday counters and their broadcast mapping
//! - [`manager`] -- the top-level manager tying it all together
//! - [`collaborators`] -- seams to the external systems this core
//!   deliberately does not implement
//! - [`config`] -- fixed content tables and tunable durations

pub mod collaborators;
pub mod conditions;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod festival;
pub mod manager;
pub mod membership;
pub mod rotation;
pub mod single_spawn;
pub mod timer;

pub use collaborators::{EntityDirectory, EventCalendar, HolidayCalendar};
pub use conditions::ConditionFlagStore;
pub use config::EventTuning;
pub use dispatch::{PartitionAction, PartitionRouter, SummonKind};
pub use error::WorldError;
pub use festival::FestivalCounters;
pub use manager::{DefeatEvent, WorldStateManager};
pub use membership::{Audience, MembershipRegistry};
pub use rotation::{DefeatOutcome, RotationMachine};
pub use single_spawn::HarbingerMachine;
pub use timer::TimedEvent;
