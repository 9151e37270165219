//! Storage abstraction trait
//!
//! This module defines the DocumentStore trait that all storage backends must
//! implement, along with the storage error taxonomy.

use async_trait::async_trait;
use bytes::Bytes;
use docsift_core::models::UploadDescriptor;
use docsift_core::StorageProvider;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Backend not configured: {0}")]
    Unconfigured(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of a delete call.
///
/// `NotFound` is success: cleanup is idempotent, and a file deleted by a
/// prior partial sweep must not fail the retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// An in-memory file handed to a backend for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        UploadFile {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// Storage backend abstraction
///
/// All backends (cloud object store, chunked database store, local no-op)
/// implement this trait so the coordinator can treat them as an ordered
/// fallback chain without coupling to implementation details.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The provider tag recorded in descriptors and ledger rows.
    fn provider(&self) -> StorageProvider;

    /// Whether this backend has the credentials it needs. Unconfigured
    /// backends are skipped by the chain; this is a routing signal, not an
    /// error.
    fn is_configured(&self) -> bool;

    /// Upload a file and return its descriptor.
    async fn upload(&self, file: &UploadFile) -> StorageResult<UploadDescriptor>;

    /// Delete a file by its backend-specific id. Idempotent.
    async fn delete(&self, file_id: &str) -> StorageResult<DeleteOutcome>;

    /// Read a file back by its backend-specific id.
    async fn download(&self, file_id: &str) -> StorageResult<Vec<u8>>;

    /// Resolve the public (or proxy) URL for a stored file. Empty when the
    /// backend has no URL scheme.
    fn resolve_url(&self, file_id: &str) -> String;
}
