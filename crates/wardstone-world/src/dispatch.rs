//! Deferred cross-partition action messages.
//!
//! Partitions are single-writer: a foreign thread must never mutate a
//! partition's live objects synchronously. Anything the manager wants to
//! happen to an entity is therefore expressed as an explicit
//! [`PartitionAction`] message enqueued onto the owning partition's
//! queue and executed later on that partition's own thread.
//!
//! Delivery is at-most-once: the consumer re-resolves the target handle
//! at execution time and silently skips entities that vanished in the
//! interim. There is no retry and no ordering guarantee relative to
//! other partitions beyond "on or after the target partition's next
//! drain".

use std::collections::BTreeMap;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::warn;
use wardstone_types::{
    EffectId, EntityHandle, PartitionId, RoamerKind, SpawnPosition, WorldStateId,
};

/// What kind of encounter a summon action should spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummonKind {
    /// One of the four rotation roamers.
    Roamer(RoamerKind),
    /// The harbinger single-spawn boss.
    Harbinger,
}

/// A deferred action executed on the owning partition's thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartitionAction {
    /// Summon an encounter at a fixed position via the spawn registry.
    Summon {
        /// Encounter to summon.
        kind: SummonKind,
        /// Where to place it.
        position: SpawnPosition,
    },
    /// Apply an effect to an entity via the effect engine.
    ApplyEffect {
        /// Target entity, re-resolved at execution time.
        target: EntityHandle,
        /// Effect to apply.
        effect: EffectId,
    },
    /// Remove an effect from an entity via the effect engine.
    ClearEffect {
        /// Target entity, re-resolved at execution time.
        target: EntityHandle,
        /// Effect to clear.
        effect: EffectId,
    },
    /// Send one named world-state value to an entity's client.
    PushWorldState {
        /// Target entity, re-resolved at execution time.
        target: EntityHandle,
        /// Which world state changed.
        state: WorldStateId,
        /// Its new value.
        value: u32,
    },
}

/// Routes deferred actions onto per-partition queues.
///
/// Each partition registers once at startup and drains its receiver on
/// its own thread. Dispatching only enqueues; the manager never blocks
/// on, or waits for, execution.
#[derive(Debug, Default)]
pub struct PartitionRouter {
    /// Send halves of the per-partition queues.
    queues: BTreeMap<PartitionId, Sender<PartitionAction>>,
}

impl PartitionRouter {
    /// Create a router with no partitions registered.
    pub const fn new() -> Self {
        Self {
            queues: BTreeMap::new(),
        }
    }

    /// Register a partition and hand back the receive half of its queue.
    ///
    /// Re-registering replaces the previous queue; actions already
    /// enqueued on the old one stay with the old receiver.
    pub fn register(&mut self, partition: PartitionId) -> Receiver<PartitionAction> {
        let (sender, receiver) = unbounded();
        self.queues.insert(partition, sender);
        receiver
    }

    /// Enqueue an action for a partition.
    ///
    /// Unknown or shut-down partitions drop the action with a warning;
    /// at-most-once semantics mean nobody retries.
    pub fn dispatch(&self, partition: PartitionId, action: PartitionAction) {
        match self.queues.get(&partition) {
            Some(sender) => {
                if sender.send(action).is_err() {
                    warn!(?partition, "partition queue disconnected, action dropped");
                }
            }
            None => {
                warn!(?partition, "no queue registered for partition, action dropped");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reaches_the_owning_partition_only() {
        let mut router = PartitionRouter::new();
        let east = router.register(PartitionId::East);
        let west = router.register(PartitionId::West);

        let target = EntityHandle::new();
        router.dispatch(
            PartitionId::West,
            PartitionAction::ApplyEffect {
                target,
                effect: EffectId::new(1),
            },
        );

        assert!(east.try_recv().is_err());
        assert_eq!(
            west.try_recv().unwrap(),
            PartitionAction::ApplyEffect {
                target,
                effect: EffectId::new(1),
            }
        );
    }

    #[test]
    fn unknown_partition_drops_the_action() {
        let mut router = PartitionRouter::new();
        let _east = router.register(PartitionId::East);
        // No panic, no error surfaced.
        router.dispatch(
            PartitionId::West,
            PartitionAction::Summon {
                kind: SummonKind::Harbinger,
                position: SpawnPosition::new(0.0, 0.0, 0.0, 0.0),
            },
        );
    }

    #[test]
    fn disconnected_queue_drops_the_action() {
        let mut router = PartitionRouter::new();
        let receiver = router.register(PartitionId::East);
        drop(receiver);
        router.dispatch(
            PartitionId::East,
            PartitionAction::ClearEffect {
                target: EntityHandle::new(),
                effect: EffectId::new(2),
            },
        );
    }
}
