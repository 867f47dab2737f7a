//! Per-audience entity handle registries.
//!
//! An audience is the set of entities currently eligible to receive a
//! broadcast or zone-wide effect, maintained from enter/leave events.
//! Handles are weak: insertion happens once per enter event without
//! de-duplication, removal takes the first match and tolerates absent
//! handles, and traversal re-resolves every handle through the entity
//! directory, skipping the dangling ones.
//!
//! The registry is not independently thread-safe; each locking domain
//! owns its own instance and all access happens under that domain's
//! mutex.

use std::collections::BTreeMap;

use wardstone_types::{AreaId, EntityHandle};

use crate::collaborators::EntityDirectory;

/// Key identifying one tracked audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Audience {
    /// Occupants of the festival capital zones.
    Capitals,
    /// Occupants of the banner frontier zones.
    Frontier,
    /// Occupants of the war-chant sanctum zones.
    Sanctum,
    /// Occupants of one tracked scripted area.
    Area(AreaId),
}

/// Ordered entity-handle membership per audience key.
#[derive(Debug, Default)]
pub struct MembershipRegistry<K> {
    /// Current members per key, in insertion order.
    members: BTreeMap<K, Vec<EntityHandle>>,
}

impl<K: Ord + Copy> MembershipRegistry<K> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            members: BTreeMap::new(),
        }
    }

    /// Record an enter event: appends unconditionally.
    pub fn enter(&mut self, key: K, handle: EntityHandle) {
        self.members.entry(key).or_default().push(handle);
    }

    /// Record a leave event: removes the first matching handle.
    ///
    /// Removing a handle that was never entered is a no-op, not an
    /// error -- leave events can race ahead of enters during teleports.
    pub fn leave(&mut self, key: K, handle: EntityHandle) {
        if let Some(list) = self.members.get_mut(&key) {
            if let Some(index) = list.iter().position(|member| *member == handle) {
                list.remove(index);
            }
        }
    }

    /// Current members of an audience (dangling handles included).
    pub fn members(&self, key: K) -> &[EntityHandle] {
        self.members.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Number of recorded members of an audience.
    pub fn count(&self, key: K) -> usize {
        self.members.get(&key).map_or(0, Vec::len)
    }

    /// Invoke `f` once per member that still resolves to a live entity.
    ///
    /// Runs under the owning domain's lock for the whole traversal; `f`
    /// must not try to re-acquire that lock.
    pub fn for_each_resolvable<F>(&self, key: K, directory: &dyn EntityDirectory, mut f: F)
    where
        F: FnMut(EntityHandle),
    {
        for handle in self.members(key) {
            if directory.is_online(*handle) {
                f(*handle);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use wardstone_types::{Faction, PartitionId};

    use super::*;

    /// Directory stub resolving only the handles it was given.
    struct FixedDirectory {
        online: BTreeSet<EntityHandle>,
    }

    impl EntityDirectory for FixedDirectory {
        fn partition_of(&self, handle: EntityHandle) -> Option<PartitionId> {
            self.online.contains(&handle).then_some(PartitionId::East)
        }

        fn faction_of(&self, _handle: EntityHandle) -> Option<Faction> {
            None
        }
    }

    #[test]
    fn enter_then_leave_restores_prior_membership() {
        let mut registry = MembershipRegistry::new();
        let resident = EntityHandle::new();
        registry.enter(Audience::Capitals, resident);

        let visitor = EntityHandle::new();
        registry.enter(Audience::Capitals, visitor);
        registry.leave(Audience::Capitals, visitor);

        assert_eq!(registry.members(Audience::Capitals), &[resident]);
    }

    #[test]
    fn leave_of_unknown_handle_is_a_no_op() {
        let mut registry = MembershipRegistry::new();
        let resident = EntityHandle::new();
        registry.enter(Audience::Frontier, resident);

        registry.leave(Audience::Frontier, EntityHandle::new());
        registry.leave(Audience::Sanctum, resident);

        assert_eq!(registry.count(Audience::Frontier), 1);
    }

    #[test]
    fn duplicate_enters_are_kept_and_removed_one_at_a_time() {
        let mut registry = MembershipRegistry::new();
        let handle = EntityHandle::new();
        registry.enter(Audience::Sanctum, handle);
        registry.enter(Audience::Sanctum, handle);
        assert_eq!(registry.count(Audience::Sanctum), 2);

        registry.leave(Audience::Sanctum, handle);
        assert_eq!(registry.count(Audience::Sanctum), 1);
    }

    #[test]
    fn traversal_skips_dangling_handles() {
        let mut registry = MembershipRegistry::new();
        let live = EntityHandle::new();
        let gone = EntityHandle::new();
        registry.enter(Audience::Capitals, live);
        registry.enter(Audience::Capitals, gone);

        let directory = FixedDirectory {
            online: BTreeSet::from([live]),
        };

        let mut visited = Vec::new();
        registry.for_each_resolvable(Audience::Capitals, &directory, |h| visited.push(h));
        assert_eq!(visited, vec![live]);
    }

    #[test]
    fn areas_are_independent_audiences() {
        let mut registry = MembershipRegistry::new();
        let handle = EntityHandle::new();
        registry.enter(Audience::Area(AreaId::new(501)), handle);
        assert_eq!(registry.count(Audience::Area(AreaId::new(501))), 1);
        assert_eq!(registry.count(Audience::Area(AreaId::new(502))), 0);
    }
}
