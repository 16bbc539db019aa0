use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Metadata describing one file held in an external content-addressed store.
///
/// The record is stored in world state under its [`id`](Self::id), encoded as
/// UTF-8 JSON. Only `id` and `owner` carry invariants; every other field is
/// accepted as-is, including empty values. Fields missing from a stored value
/// decode to their zero value and unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileMetadata {
    /// Caller-assigned key. Must be non-empty.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Opaque pointer into the external blob store (an IPFS CID in practice).
    #[serde(rename = "ipfsCID")]
    pub storage_reference: String,
    /// Size of the referenced file in bytes. Informational only.
    pub size: i64,
    pub mime_type: String,
    /// Identifier of an externally managed encryption key. No key material
    /// is ever held in the record.
    pub encryption_key_id: String,
    /// Identity of the record creator. A label, not an access-control subject.
    pub owner: String,
    /// Caller-supplied timestamp; not validated.
    pub created_at: String,
    /// Caller-supplied timestamp; not validated.
    pub last_modified: String,
}

impl FileMetadata {
    /// Create a record with the two required fields set and everything else empty.
    pub fn new(id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_storage_reference(mut self, reference: impl Into<String>) -> Self {
        self.storage_reference = reference.into();
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_encryption_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.encryption_key_id = key_id.into();
        self
    }

    /// Set both timestamps.
    pub fn with_timestamps(
        mut self,
        created_at: impl Into<String>,
        last_modified: impl Into<String>,
    ) -> Self {
        self.created_at = created_at.into();
        self.last_modified = last_modified.into();
        self
    }

    /// Check the creation invariants: `id` and `owner` must be non-empty.
    ///
    /// `id` is checked first, so a record missing both reports the id.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.id.is_empty() {
            return Err(TypeError::MissingField { field: "id" });
        }
        if self.owner.is_empty() {
            return Err(TypeError::MissingField { field: "owner" });
        }
        Ok(())
    }

    /// Encode as the UTF-8 JSON stored in world state.
    pub fn to_json(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Decode a world-state value.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
