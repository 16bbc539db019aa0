use std::ops::Bound;

use crate::error::StateResult;

/// One entry produced by a range scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A handle over the results of a range scan.
///
/// Yields entries in key order. The handle holds a resource on the host side
/// and must be released with [`close`](Self::close) whether or not it was
/// consumed to the end. Once closed the iterator yields nothing further.
pub trait StateIterator: Iterator<Item = StateResult<KeyValue>> + Send {
    /// Release the scan. Closing twice is a no-op.
    fn close(&mut self) -> StateResult<()>;
}

/// Key-value view of ledger world state, supplied by the host per invocation.
///
/// Implementations provide atomic single-key reads and writes. Ordering and
/// isolation between concurrent invocations belong to the host; callers must
/// not assume compare-and-swap or locking is available.
pub trait WorldState: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn put_state(&self, key: &str, value: &[u8]) -> StateResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn del_state(&self, key: &str) -> StateResult<()>;

    /// Open a scan over keys in `[start_key, end_key)`.
    ///
    /// An empty `start_key` starts at the first key and an empty `end_key`
    /// runs through the last, so `("", "")` scans everything.
    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> StateResult<Box<dyn StateIterator>>;
}

/// Translate range-scan arguments into map bounds.
///
/// Returns `None` when the range is empty (start sorts after end).
pub(crate) fn range_bounds<'a>(
    start_key: &'a str,
    end_key: &'a str,
) -> Option<(Bound<&'a str>, Bound<&'a str>)> {
    if !start_key.is_empty() && !end_key.is_empty() && start_key > end_key {
        return None;
    }
    let lower = if start_key.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(start_key)
    };
    let upper = if end_key.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end_key)
    };
    Some((lower, upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_range_is_unbounded() {
        assert_eq!(
            range_bounds("", ""),
            Some((Bound::Unbounded, Bound::Unbounded))
        );
    }

    #[test]
    fn half_open_range() {
        assert_eq!(
            range_bounds("a", "c"),
            Some((Bound::Included("a"), Bound::Excluded("c")))
        );
    }

    #[test]
    fn inverted_range_is_empty() {
        assert_eq!(range_bounds("z", "a"), None);
    }
}
