use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{StateError, StateResult};
use crate::iter::SnapshotIterator;
use crate::traits::{range_bounds, KeyValue, StateIterator, WorldState};

/// In-memory, `BTreeMap`-based world state.
///
/// Intended for tests and embedding. Entries live behind a `RwLock`, range
/// scans copy the matching entries out under the read lock, and the store
/// counts scan handles that have not been closed yet.
pub struct InMemoryWorldState {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    open_scans: Arc<AtomicUsize>,
}

impl InMemoryWorldState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::from_entries(BTreeMap::new())
    }

    pub(crate) fn from_entries(entries: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            entries: RwLock::new(entries),
            open_scans: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> StateResult<usize> {
        let map = self.entries.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(map.len())
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> StateResult<bool> {
        Ok(self.len()? == 0)
    }

    /// All stored keys in ascending order.
    pub fn keys(&self) -> StateResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(map.keys().cloned().collect())
    }

    /// Remove every entry.
    pub fn clear(&self) -> StateResult<()> {
        self.entries
            .write()
            .map_err(|_| StateError::LockPoisoned)?
            .clear();
        Ok(())
    }

    /// Number of range scans opened and not yet closed.
    pub fn open_scans(&self) -> usize {
        self.open_scans.load(Ordering::SeqCst)
    }

    /// Copy of the whole map, for backends that persist it.
    pub(crate) fn snapshot(&self) -> StateResult<BTreeMap<String, Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(map.clone())
    }

    /// Apply `mutate` under the write lock, then run `commit` against the
    /// mutated map. If `commit` fails the map is restored to its prior state.
    pub(crate) fn mutate_with<F, C>(&self, mutate: F, commit: C) -> StateResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, Vec<u8>>),
        C: FnOnce(&BTreeMap<String, Vec<u8>>) -> StateResult<()>,
    {
        let mut map = self.entries.write().map_err(|_| StateError::LockPoisoned)?;
        let before = map.clone();
        mutate(&mut *map);
        if let Err(e) = commit(&*map) {
            *map = before;
            return Err(e);
        }
        Ok(())
    }
}

impl Default for InMemoryWorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState for InMemoryWorldState {
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StateResult<()> {
        if key.is_empty() {
            return Err(StateError::EmptyKey);
        }
        let mut map = self.entries.write().map_err(|_| StateError::LockPoisoned)?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn del_state(&self, key: &str) -> StateResult<()> {
        if key.is_empty() {
            return Err(StateError::EmptyKey);
        }
        let mut map = self.entries.write().map_err(|_| StateError::LockPoisoned)?;
        map.remove(key);
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> StateResult<Box<dyn StateIterator>> {
        let map = self.entries.read().map_err(|_| StateError::LockPoisoned)?;
        let entries = match range_bounds(start_key, end_key) {
            Some(bounds) => map
                .range::<str, _>(bounds)
                .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
                .collect(),
            None => Vec::new(),
        };
        Ok(Box::new(SnapshotIterator::new(
            entries,
            Arc::clone(&self.open_scans),
        )))
    }
}

impl std::fmt::Debug for InMemoryWorldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryWorldState")
            .field("key_count", &self.len().ok())
            .field("open_scans", &self.open_scans())
            .finish()
    }
}
