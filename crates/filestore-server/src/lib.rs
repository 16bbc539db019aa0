//! HTTP host for the FileStore ledger.
//!
//! Stands in for the peer runtime that normally hosts the contract: owns a
//! world-state backend, creates one transaction context per request, orders
//! writes, and exposes the contract's functions over HTTP.

pub mod config;
pub mod error;
pub mod handler;
pub mod host;
pub mod router;
pub mod server;

pub use config::{ServerConfig, StateConfig};
pub use error::{ServerError, ServerResult};
pub use handler::{stamp_new_record, timestamp_now, HealthResponse, InvokeRequest, JsonBody};
pub use host::Host;
pub use server::FileStoreServer;
