use filestore_state::StateError;
use filestore_types::TypeError;

/// Errors produced by contract operations.
///
/// Every error is terminal for the invocation that raised it and is surfaced
/// to the host unchanged. Nothing is retried or partially applied.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// A required record field was empty.
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// The operation needs a record that is not stored.
    #[error("the file metadata {id} does not exist")]
    NotFound { id: String },

    /// A record could not be encoded, or a stored value could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// World state failed for a reason other than absence.
    #[error("failed to access world state: {0}")]
    StoreAccess(#[from] StateError),

    /// The host asked for a function this contract does not export.
    #[error("unknown transaction function: {0}")]
    UnknownFunction(String),

    /// A transaction was invoked with the wrong number or shape of arguments.
    #[error("invalid arguments for {function}: {reason}")]
    InvalidArguments {
        function: &'static str,
        reason: String,
    },
}

impl From<TypeError> for ContractError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::MissingField { field } => Self::Validation { field },
            TypeError::Serialization(reason) => Self::Serialization(reason),
        }
    }
}

impl ContractError {
    /// A stored value under `key` did not decode as a record.
    pub(crate) fn decode(key: &str, err: TypeError) -> Self {
        let reason = match err {
            TypeError::Serialization(reason) => reason,
            other => other.to_string(),
        };
        Self::Serialization(format!("failed to decode file metadata {key}: {reason}"))
    }
}

/// Result alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;
