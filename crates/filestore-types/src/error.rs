use thiserror::Error;

/// Errors produced by record type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("serialization error: {0}")]
    Serialization(String),
}
