//! World-state boundary for the FileStore metadata ledger.
//!
//! The ledger never owns durability. A hosting peer hands each invocation a
//! key-value view of world state, and this crate describes that view as the
//! [`WorldState`] trait: point reads, writes, deletes, and ordered range
//! scans that must be closed explicitly.
//!
//! # Backends
//!
//! - [`InMemoryWorldState`] -- `BTreeMap`-based state for tests and embedding
//! - [`FileWorldState`] -- the same map persisted as one snapshot file
//!
//! # Rules
//!
//! 1. Absence is `Ok(None)`, never an error.
//! 2. Keys are non-empty strings; writes to the empty key are rejected.
//! 3. Range scans see a snapshot taken when the scan opens.
//! 4. Every scan handle must be closed by its consumer.

pub mod error;
pub mod file;
pub mod iter;
pub mod memory;
pub mod traits;

pub use error::{StateError, StateResult};
pub use file::FileWorldState;
pub use iter::SnapshotIterator;
pub use memory::InMemoryWorldState;
pub use traits::{KeyValue, StateIterator, WorldState};
