/// Errors from world-state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Keys must be non-empty strings.
    #[error("key must not be an empty string")]
    EmptyKey,

    /// The backing store could not serve the request.
    #[error("state store unavailable: {0}")]
    Unavailable(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A lock guarding in-process state was poisoned by a panicking writer.
    #[error("state lock poisoned")]
    LockPoisoned,
}

/// Result alias for world-state operations.
pub type StateResult<T> = Result<T, StateError>;
