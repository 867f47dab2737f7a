//! The record backend contract and the in-memory reference backend.

use std::collections::BTreeMap;
use std::sync::Mutex;

use wardstone_types::SaveId;

use crate::error::PersistError;

/// Synchronous key-scoped storage for world-event records.
///
/// The contract is deliberately tiny: each [`SaveId`] maps to at most
/// one row, `replace` has delete-then-insert semantics (last write wins,
/// no merge), and a later `load_all` observes the last completed write.
///
/// Implementations are called from inside the manager's locking domains
/// at state-transition edges only, so they must be fast; a backend that
/// fronts a slow store should enqueue the write internally and accept
/// eventual durability.
pub trait RecordBackend: Send + Sync {
    /// Load every stored record.
    ///
    /// Ids with no row are simply absent from the map, which the caller
    /// treats as "use defaults".
    fn load_all(&self) -> Result<BTreeMap<SaveId, String>, PersistError>;

    /// Atomically replace the record for `id` with `payload`.
    fn replace(&self, id: SaveId, payload: &str) -> Result<(), PersistError>;
}

/// In-memory [`RecordBackend`] used by tests and single-process embeds.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Row storage protected by a mutex.
    rows: Mutex<BTreeMap<SaveId, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with pre-existing rows (simulating a prior run).
    pub fn with_rows(rows: BTreeMap<SaveId, String>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

impl RecordBackend for MemoryBackend {
    fn load_all(&self) -> Result<BTreeMap<SaveId, String>, PersistError> {
        let Ok(rows) = self.rows.lock() else {
            return Err(PersistError::Backend {
                message: "record store mutex poisoned".to_owned(),
            });
        };
        Ok(rows.clone())
    }

    fn replace(&self, id: SaveId, payload: &str) -> Result<(), PersistError> {
        let Ok(mut rows) = self.rows.lock() else {
            return Err(PersistError::Backend {
                message: "record store mutex poisoned".to_owned(),
            });
        };
        rows.insert(id, payload.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn replace_is_last_write_wins() {
        let backend = MemoryBackend::new();
        backend.replace(SaveId::Festival, "v1 1 0 0 0 0 0").unwrap();
        backend.replace(SaveId::Festival, "v1 2 0 0 0 0 0").unwrap();

        let rows = backend.load_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.get(&SaveId::Festival).unwrap(), "v1 2 0 0 0 0 0");
    }

    #[test]
    fn absent_ids_load_as_absent() {
        let backend = MemoryBackend::new();
        let rows = backend.load_all().unwrap();
        assert!(rows.is_empty());
    }
}
