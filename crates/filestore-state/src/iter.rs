use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::StateResult;
use crate::traits::{KeyValue, StateIterator};

/// Scan handle over entries copied out of a map when the scan opened.
///
/// Each handle registers itself in a shared open-scan counter and
/// deregisters on [`close`](StateIterator::close). Dropping a handle without
/// closing it leaves it counted, the way an unreleased host iterator would
/// stay open.
pub struct SnapshotIterator {
    entries: std::vec::IntoIter<KeyValue>,
    open_scans: Arc<AtomicUsize>,
    closed: bool,
}

impl SnapshotIterator {
    pub(crate) fn new(entries: Vec<KeyValue>, open_scans: Arc<AtomicUsize>) -> Self {
        open_scans.fetch_add(1, Ordering::SeqCst);
        Self {
            entries: entries.into_iter(),
            open_scans,
            closed: false,
        }
    }

    /// Entries not yet yielded.
    pub fn remaining(&self) -> usize {
        if self.closed {
            0
        } else {
            self.entries.len()
        }
    }
}

impl Iterator for SnapshotIterator {
    type Item = StateResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.entries.next().map(Ok)
    }
}

impl StateIterator for SnapshotIterator {
    fn close(&mut self) -> StateResult<()> {
        if !self.closed {
            self.closed = true;
            self.open_scans.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SnapshotIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotIterator")
            .field("remaining", &self.remaining())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<KeyValue> {
        vec![KeyValue::new("a", b"1".to_vec()), KeyValue::new("b", b"2".to_vec())]
    }

    #[test]
    fn yields_in_order_then_ends() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut it = SnapshotIterator::new(entries(), Arc::clone(&counter));
        assert_eq!(it.next().unwrap().unwrap().key, "a");
        assert_eq!(it.next().unwrap().unwrap().key, "b");
        assert!(it.next().is_none());
        it.close().unwrap();
    }

    #[test]
    fn close_deregisters_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut it = SnapshotIterator::new(entries(), Arc::clone(&counter));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        it.close().unwrap();
        it.close().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn closed_iterator_yields_nothing() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut it = SnapshotIterator::new(entries(), counter);
        it.close().unwrap();
        assert_eq!(it.remaining(), 0);
        assert!(it.next().is_none());
    }

    #[test]
    fn drop_without_close_stays_registered() {
        let counter = Arc::new(AtomicUsize::new(0));
        drop(SnapshotIterator::new(entries(), Arc::clone(&counter)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
