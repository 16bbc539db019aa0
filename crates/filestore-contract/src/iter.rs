use filestore_state::StateIterator;
use filestore_types::FileMetadata;
use tracing::warn;

use crate::error::{ContractError, ContractResult};

/// Lazy sequence of records decoded from a world-state range scan.
///
/// Decodes one record per call to `next`. The underlying scan is closed as
/// soon as it is exhausted or the first error is produced, and on drop if the
/// consumer stops early. After that the iterator yields nothing; it cannot be
/// restarted.
pub struct FileIter {
    scan: Option<Box<dyn StateIterator>>,
}

impl FileIter {
    pub(crate) fn new(scan: Box<dyn StateIterator>) -> Self {
        Self { scan: Some(scan) }
    }

    /// Close the scan, reporting a failure to release it.
    fn finish(&mut self) -> ContractResult<()> {
        if let Some(mut scan) = self.scan.take() {
            scan.close()?;
        }
        Ok(())
    }

    /// Close the scan on an error or early-exit path. A close failure here
    /// is logged, not returned, so the caller still sees the first error.
    fn release(&mut self) {
        if let Err(e) = self.finish() {
            warn!(error = %e, "failed to close state scan");
        }
    }
}

impl Iterator for FileIter {
    type Item = ContractResult<FileMetadata>;

    fn next(&mut self) -> Option<Self::Item> {
        let scan = self.scan.as_mut()?;
        match scan.next() {
            Some(Ok(entry)) => match FileMetadata::from_json(&entry.value) {
                Ok(metadata) => Some(Ok(metadata)),
                Err(e) => {
                    self.release();
                    Some(Err(ContractError::decode(&entry.key, e)))
                }
            },
            Some(Err(e)) => {
                self.release();
                Some(Err(e.into()))
            }
            None => self.finish().err().map(Err),
        }
    }
}

impl Drop for FileIter {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for FileIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileIter")
            .field("open", &self.scan.is_some())
            .finish()
    }
}
