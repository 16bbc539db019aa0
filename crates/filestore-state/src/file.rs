use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::memory::InMemoryWorldState;
use crate::traits::{StateIterator, WorldState};

/// World state persisted as a single snapshot file.
///
/// The full map is held in memory and every successful write rewrites the
/// snapshot. Rewrites go to a temporary file in the same directory that is
/// then renamed over the snapshot, so a crash leaves either the old or the
/// new map on disk, never a torn one.
///
/// On-disk format: the bincode encoding of a `BTreeMap<String, Vec<u8>>`.
pub struct FileWorldState {
    path: PathBuf,
    inner: InMemoryWorldState,
}

impl FileWorldState {
    /// Open the snapshot at `path`, starting empty if it does not exist.
    ///
    /// The parent directory is created when missing.
    pub fn open(path: impl AsRef<Path>) -> StateResult<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(snapshot_dir(&path))?;

        let entries: BTreeMap<String, Vec<u8>> = if path.exists() {
            let bytes = fs::read(&path)?;
            bincode::deserialize(&bytes).map_err(|e| StateError::Serialization(e.to_string()))?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "opened state snapshot");

        Ok(Self {
            path,
            inner: InMemoryWorldState::from_entries(entries),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> StateResult<usize> {
        self.inner.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> StateResult<bool> {
        self.inner.is_empty()
    }

    /// Number of range scans opened and not yet closed.
    pub fn open_scans(&self) -> usize {
        self.inner.open_scans()
    }

    /// Write the current map to disk even if nothing changed.
    pub fn flush(&self) -> StateResult<()> {
        let map = self.inner.snapshot()?;
        persist(&self.path, &map)
    }
}

impl WorldState for FileWorldState {
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        self.inner.get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StateResult<()> {
        if key.is_empty() {
            return Err(StateError::EmptyKey);
        }
        self.inner.mutate_with(
            |map| {
                map.insert(key.to_string(), value.to_vec());
            },
            |map| persist(&self.path, map),
        )
    }

    fn del_state(&self, key: &str) -> StateResult<()> {
        if key.is_empty() {
            return Err(StateError::EmptyKey);
        }
        self.inner.mutate_with(
            |map| {
                map.remove(key);
            },
            |map| persist(&self.path, map),
        )
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> StateResult<Box<dyn StateIterator>> {
        self.inner.get_state_by_range(start_key, end_key)
    }
}

impl std::fmt::Debug for FileWorldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWorldState")
            .field("path", &self.path)
            .field("key_count", &self.len().ok())
            .finish()
    }
}

fn snapshot_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn persist(path: &Path, map: &BTreeMap<String, Vec<u8>>) -> StateResult<()> {
    let bytes = bincode::serialize(map).map_err(|e| StateError::Serialization(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(snapshot_dir(path))?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StateError::Io(e.error))?;

    debug!(path = %path.display(), keys = map.len(), bytes = bytes.len(), "persisted state snapshot");
    Ok(())
}
