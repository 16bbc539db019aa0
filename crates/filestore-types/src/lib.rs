//! Foundation types for the FileStore metadata ledger.
//!
//! The ledger stores one kind of record, [`FileMetadata`], describing a file
//! whose bytes live in an external content-addressed blob store. This crate
//! owns the record's shape, its JSON wire encoding, and the small amount of
//! validation applied when a record is created.
//!
//! The JSON field names are a compatibility surface with data already
//! written to existing ledgers and must not change:
//!
//! ```text
//! id, name, description, ipfsCID, size, mimeType,
//! encryptionKeyId, owner, createdAt, lastModified
//! ```

pub mod error;
pub mod metadata;

pub use error::TypeError;
pub use metadata::FileMetadata;
