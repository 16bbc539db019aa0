use std::sync::Arc;

use filestore_contract::{FileStoreContract, Transaction, TransactionContext};
use filestore_state::{InMemoryWorldState, WorldState};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ServerError, ServerResult};

/// Shared host state: the world state being served and the contract that
/// runs against it.
///
/// Each call to [`Host::run`] opens a fresh [`TransactionContext`] with its
/// own transaction id. Submit transactions are serialized through one lock so
/// that an existence check and the write that follows it cannot interleave
/// with another writer; evaluate transactions run unlocked. The contract
/// itself runs on the blocking pool, since a file-backed state syncs to disk
/// on every write.
#[derive(Clone)]
pub struct Host {
    inner: Arc<HostInner>,
}

struct HostInner {
    world: Arc<dyn WorldState>,
    contract: FileStoreContract,
    submit_lock: Mutex<()>,
}

impl Host {
    pub fn new(world: Arc<dyn WorldState>) -> Self {
        Self {
            inner: Arc::new(HostInner {
                world,
                contract: FileStoreContract::new(),
                submit_lock: Mutex::new(()),
            }),
        }
    }

    /// A host over fresh in-memory state.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryWorldState::new()))
    }

    pub fn world(&self) -> &dyn WorldState {
        self.inner.world.as_ref()
    }

    /// Execute one transaction and return its response payload.
    pub async fn run(&self, tx: Transaction) -> ServerResult<Vec<u8>> {
        let tx_id = uuid::Uuid::now_v7().to_string();
        let _guard = if tx.is_submit() {
            Some(self.inner.submit_lock.lock().await)
        } else {
            None
        };
        debug!(tx_id = %tx_id, function = tx.function_name(), submit = tx.is_submit(), "running transaction");
        let inner = Arc::clone(&self.inner);
        let payload = tokio::task::spawn_blocking(move || {
            let ctx = TransactionContext::new(&tx_id, inner.world.as_ref());
            inner.contract.execute(&ctx, tx)
        })
        .await
        .map_err(|e| ServerError::Internal(format!("transaction task failed: {e}")))??;
        Ok(payload)
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
