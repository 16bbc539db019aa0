use filestore_types::FileMetadata;
use tracing::debug;

use crate::context::TransactionContext;
use crate::error::{ContractError, ContractResult};
use crate::iter::FileIter;

/// The file metadata record store.
///
/// A stateless handler: every operation reads and writes only the world
/// state carried by the [`TransactionContext`] it is given, as one atomic
/// unit of work. Atomicity and isolation come from the host; the contract
/// takes no locks of its own.
///
/// `owner` is recorded but never enforced. Any caller can update or delete
/// any record.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileStoreContract;

impl FileStoreContract {
    pub fn new() -> Self {
        Self
    }

    /// Store a record under its id.
    ///
    /// Requires non-empty `id` and `owner`. Writes unconditionally: an
    /// existing record with the same id is replaced.
    pub fn store_file(
        &self,
        ctx: &TransactionContext<'_>,
        metadata: &FileMetadata,
    ) -> ContractResult<()> {
        metadata.validate()?;
        self.put_record(ctx, metadata)?;
        debug!(tx_id = ctx.tx_id(), id = %metadata.id, owner = %metadata.owner, "stored file metadata");
        Ok(())
    }

    /// Read the record stored under `id`.
    pub fn get_file(&self, ctx: &TransactionContext<'_>, id: &str) -> ContractResult<FileMetadata> {
        let bytes = ctx
            .state()
            .get_state(id)?
            .ok_or_else(|| ContractError::NotFound { id: id.to_string() })?;
        FileMetadata::from_json(&bytes).map_err(|e| ContractError::decode(id, e))
    }

    /// Lazily enumerate every stored record in world-state key order.
    pub fn iter_files(&self, ctx: &TransactionContext<'_>) -> ContractResult<FileIter> {
        let scan = ctx.state().get_state_by_range("", "")?;
        Ok(FileIter::new(scan))
    }

    /// Read every stored record.
    ///
    /// Fails as a whole if any record fails to decode; partial results are
    /// discarded. The scan is closed on every path.
    pub fn get_all_files(&self, ctx: &TransactionContext<'_>) -> ContractResult<Vec<FileMetadata>> {
        let files = self.iter_files(ctx)?.collect::<ContractResult<Vec<_>>>()?;
        debug!(tx_id = ctx.tx_id(), count = files.len(), "listed file metadata");
        Ok(files)
    }

    /// Replace an existing record wholesale. No fields are merged.
    pub fn update_file(
        &self,
        ctx: &TransactionContext<'_>,
        metadata: &FileMetadata,
    ) -> ContractResult<()> {
        if !self.file_exists(ctx, &metadata.id)? {
            return Err(ContractError::NotFound {
                id: metadata.id.clone(),
            });
        }
        self.put_record(ctx, metadata)?;
        debug!(tx_id = ctx.tx_id(), id = %metadata.id, "updated file metadata");
        Ok(())
    }

    /// Remove an existing record. The referenced blob is left untouched.
    pub fn delete_file(&self, ctx: &TransactionContext<'_>, id: &str) -> ContractResult<()> {
        if !self.file_exists(ctx, id)? {
            return Err(ContractError::NotFound { id: id.to_string() });
        }
        ctx.state().del_state(id)?;
        debug!(tx_id = ctx.tx_id(), id, "deleted file metadata");
        Ok(())
    }

    /// Whether a record is stored under `id`.
    pub fn file_exists(&self, ctx: &TransactionContext<'_>, id: &str) -> ContractResult<bool> {
        Ok(ctx.state().get_state(id)?.is_some())
    }

    fn put_record(&self, ctx: &TransactionContext<'_>, metadata: &FileMetadata) -> ContractResult<()> {
        let bytes = metadata.to_json()?;
        ctx.state().put_state(&metadata.id, &bytes)?;
        Ok(())
    }
}
