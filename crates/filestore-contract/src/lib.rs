//! File metadata record store for the FileStore ledger.
//!
//! This crate is the contract a hosting peer invokes. It provides:
//! - [`FileStoreContract`], a stateless handler with six operations: store,
//!   get, get-all, update, delete, and exists
//! - [`TransactionContext`], the per-invocation view of world state
//! - [`FileIter`], a lazy record scan that always releases its handle
//! - [`Transaction`] and [`FileStoreContract::invoke`] for by-name dispatch
//! - [`ContractError`], the error taxonomy surfaced to the host
//!
//! Durability, ordering and isolation belong to the host's
//! [`WorldState`](filestore_state::WorldState). The contract holds no state
//! between invocations.

pub mod context;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod iter;

pub use context::TransactionContext;
pub use contract::FileStoreContract;
pub use dispatch::{Transaction, FUNCTIONS};
pub use error::{ContractError, ContractResult};
pub use iter::FileIter;
