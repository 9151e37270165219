use serde::{Deserialize, Serialize};

use crate::provider::StorageProvider;

/// Descriptor returned to the caller for every upload.
///
/// Transient: this subsystem never persists descriptors; callers derive a
/// cleanup record from one and hand that to the ledger. A descriptor with
/// `storage_provider == Local` and an empty `url` means the file was not
/// durably stored and exists only for the current request's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDescriptor {
    /// Backend-opaque identifier (object key, chunked-store id, or a
    /// generated id for the local fallback).
    pub file_id: String,
    /// Browsable URL (cloud), internal proxy path (chunked), or empty (local).
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    /// Size in bytes. Provider-reported where the backend can report one, so
    /// partial transfers are detectable by comparing against the source.
    pub size: i64,
    pub file_name: String,
    pub file_type: String,
    pub storage_provider: StorageProvider,
}

impl UploadDescriptor {
    /// True when the file is only metadata-tracked, not durably stored.
    pub fn is_degraded(&self) -> bool {
        self.storage_provider == StorageProvider::Local
    }
}
