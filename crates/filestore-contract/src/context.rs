use filestore_state::WorldState;

/// Per-invocation execution context handed to the contract by the host.
///
/// Carries the world-state view the invocation runs against and the
/// transaction id used to correlate log lines. Contexts are cheap and are
/// created fresh for every invocation.
#[derive(Clone, Copy)]
pub struct TransactionContext<'a> {
    tx_id: &'a str,
    state: &'a dyn WorldState,
}

impl<'a> TransactionContext<'a> {
    pub fn new(tx_id: &'a str, state: &'a dyn WorldState) -> Self {
        Self { tx_id, state }
    }

    pub fn tx_id(&self) -> &'a str {
        self.tx_id
    }

    /// The world-state view for this invocation.
    pub fn state(&self) -> &'a dyn WorldState {
        self.state
    }
}

impl std::fmt::Debug for TransactionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("tx_id", &self.tx_id)
            .finish_non_exhaustive()
    }
}
