//! Type-safe identifier wrappers.
//!
//! Entity handles are weak references to live objects owned by the
//! simulation partitions: holding one never keeps the entity alive, and
//! every use must re-resolve it through the entity directory. Zone, area,
//! condition, world-state and effect identifiers are small integers with
//! reserved meanings fixed by content data; the newtypes exist so they
//! cannot be mixed up at compile time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weak reference to an entity living inside a simulation partition.
///
/// The manager never owns entity lifetime. A handle may stop resolving
/// at any moment (the entity left, died, or logged off); lookups that
/// come back empty are silently skipped, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub Uuid);

impl EntityHandle {
    /// Create a fresh handle using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EntityHandle {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Generates a newtype wrapper around `u32` with standard derives.
macro_rules! define_small_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            /// Wrap a raw identifier value.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Return the raw identifier value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

define_small_id! {
    /// Identifier of a zone (a broad region spanning one partition).
    ZoneId
}

define_small_id! {
    /// Identifier of an area (a sub-region within a zone).
    AreaId
}

define_small_id! {
    /// Identifier of a multi-step puzzle condition family member.
    ///
    /// The full set of valid condition ids is known at startup;
    /// addressing an unregistered id is a programming error.
    ConditionId
}

define_small_id! {
    /// Identifier of a named world-state value broadcast to clients as a
    /// `(world state, value)` pair by the protocol codec.
    WorldStateId
}

define_small_id! {
    /// Identifier of an aura/buff effect applied by the effect engine.
    EffectId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_handles_are_unique() {
        let a = EntityHandle::new();
        let b = EntityHandle::new();
        assert_ne!(a, b);
    }

    #[test]
    fn small_ids_do_not_mix() {
        let zone = ZoneId::new(101);
        assert_eq!(zone.into_inner(), 101);
        assert_eq!(format!("{zone}"), "101");
    }

    #[test]
    fn handles_serialize_as_uuid_strings() {
        let handle = EntityHandle::new();
        let json = serde_json::to_string(&handle).unwrap();
        let back: EntityHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(handle, back);
    }
}
