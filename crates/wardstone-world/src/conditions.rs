//! Puzzle condition flag store.
//!
//! Multi-step puzzle chains (the ferry routes) expose their progress as
//! an opaque state code per condition id. The id space is closed and
//! registered at construction; addressing an unknown id is a programming
//! error surfaced as [`WorldError::UnknownCondition`] rather than a
//! silent default.

use std::collections::BTreeMap;

use tracing::warn;
use wardstone_persist::ConditionRecord;
use wardstone_types::ConditionId;

use crate::error::WorldError;

/// Key→state-code map over a closed set of condition ids.
#[derive(Debug, Default)]
pub struct ConditionFlagStore {
    /// Current state code per registered condition.
    states: BTreeMap<ConditionId, u32>,
}

impl ConditionFlagStore {
    /// Build the store from its seed table of `(id, initial state)`.
    pub fn new(seeds: &[(ConditionId, u32)]) -> Self {
        Self {
            states: seeds.iter().copied().collect(),
        }
    }

    /// Overwrite the state code of a registered condition.
    pub fn set_state(&mut self, id: ConditionId, state: u32) -> Result<(), WorldError> {
        match self.states.get_mut(&id) {
            Some(slot) => {
                *slot = state;
                Ok(())
            }
            None => Err(WorldError::UnknownCondition(id)),
        }
    }

    /// Current state code of a registered condition.
    pub fn state(&self, id: ConditionId) -> Result<u32, WorldError> {
        self.states
            .get(&id)
            .copied()
            .ok_or(WorldError::UnknownCondition(id))
    }

    /// Whether the condition currently equals the expected state code.
    pub fn is_fulfilled(&self, id: ConditionId, expected: u32) -> Result<bool, WorldError> {
        Ok(self.state(id)? == expected)
    }

    /// Overlay persisted states onto the registered ids.
    ///
    /// Pairs for ids that are no longer registered (stale content) are
    /// skipped with a warning instead of resurrecting dead conditions.
    pub fn apply_record(&mut self, record: &ConditionRecord) {
        for (id, state) in &record.states {
            match self.states.get_mut(id) {
                Some(slot) => *slot = *state,
                None => warn!(%id, "persisted state for unregistered condition, skipped"),
            }
        }
    }

    /// Snapshot the current states for persistence.
    pub fn to_record(&self) -> ConditionRecord {
        ConditionRecord {
            states: self.states.iter().map(|(id, state)| (*id, *state)).collect(),
        }
    }
}
