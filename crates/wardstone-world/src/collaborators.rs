//! Seams to the external systems this core deliberately does not
//! implement.
//!
//! The manager is constructed with trait objects for these seams and
//! never reaches for ambient globals; the embedding server wires in its
//! real implementations, tests wire in stubs.

use wardstone_types::{CalendarEvent, EntityHandle, Faction, PartitionId};

/// Resolves weak entity handles against the live world.
///
/// Handles go stale at any time; every resolution is point-in-time and
/// a `None` simply means "skip this one".
pub trait EntityDirectory: Send + Sync {
    /// Partition currently hosting the entity, if it is still live.
    fn partition_of(&self, handle: EntityHandle) -> Option<PartitionId>;

    /// Faction of the entity, if it is still live.
    fn faction_of(&self, handle: EntityHandle) -> Option<Faction>;

    /// Whether the handle still resolves to a live entity.
    fn is_online(&self, handle: EntityHandle) -> bool {
        self.partition_of(handle).is_some()
    }
}

/// Read-only view of the holiday calendar.
pub trait HolidayCalendar: Send + Sync {
    /// Whether the festival holiday is currently active.
    fn is_festival_active(&self) -> bool;
}

/// Control surface of the scripted event calendar.
///
/// Starting an already-running event (or stopping a stopped one) must be
/// a no-op on the implementation side; the manager re-asserts the
/// desired set on every era change.
pub trait EventCalendar: Send + Sync {
    /// Ensure the given event is running.
    fn start_event(&self, event: CalendarEvent);

    /// Ensure the given event is stopped.
    fn stop_event(&self, event: CalendarEvent);
}
