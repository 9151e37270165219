//! Test helpers: scripted storage backends and ledger record builders.
//!
//! Run from workspace root: `cargo test -p docsift-services`.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use docsift_core::models::{CleanupRecord, UploadDescriptor};
use docsift_core::StorageProvider;
use docsift_storage::{DeleteOutcome, DocumentStore, StorageError, StorageResult, UploadFile};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Backend whose delete behavior is scripted per file id.
pub struct ScriptedBackend {
    provider: StorageProvider,
    fail_ids: Vec<String>,
    missing_ids: Vec<String>,
    pub delete_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(provider: StorageProvider) -> Self {
        ScriptedBackend {
            provider,
            fail_ids: Vec::new(),
            missing_ids: Vec::new(),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Deletes of these ids fail with a transient error.
    pub fn failing_on(mut self, ids: &[&str]) -> Self {
        self.fail_ids = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Deletes of these ids report the file as already gone.
    pub fn missing(mut self, ids: &[&str]) -> Self {
        self.missing_ids = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn deletes(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for ScriptedBackend {
    fn provider(&self) -> StorageProvider {
        self.provider
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn upload(&self, file: &UploadFile) -> StorageResult<UploadDescriptor> {
        Ok(UploadDescriptor {
            file_id: format!("{}-id", self.provider),
            url: self.resolve_url(&format!("{}-id", self.provider)),
            public_id: None,
            size: file.data.len() as i64,
            file_name: file.file_name.clone(),
            file_type: file.content_type.clone(),
            storage_provider: self.provider,
        })
    }

    async fn delete(&self, file_id: &str) -> StorageResult<DeleteOutcome> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ids.iter().any(|id| id == file_id) {
            return Err(StorageError::DeleteFailed("connection reset".to_string()));
        }
        if self.missing_ids.iter().any(|id| id == file_id) {
            return Ok(DeleteOutcome::NotFound);
        }
        Ok(DeleteOutcome::Deleted)
    }

    async fn download(&self, file_id: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(file_id.to_string()))
    }

    fn resolve_url(&self, file_id: &str) -> String {
        match self.provider {
            StorageProvider::Chunked => format!("/api/files/{}", file_id),
            _ => format!("https://cloud.example.com/{}", file_id),
        }
    }
}

/// An expired record pointing at a backend file. `hours_ago` controls how
/// long past expiry it is; larger values also push `uploaded_at` earlier so
/// sweep ordering is deterministic.
pub fn expired_record(
    provider: StorageProvider,
    backend_id: Option<&str>,
    hours_ago: i64,
) -> CleanupRecord {
    let now = Utc::now();
    CleanupRecord::new(
        Uuid::new_v4(),
        "session-1".to_string(),
        backend_id.map(String::from),
        provider,
        now - Duration::hours(hours_ago + 1),
        now - Duration::hours(hours_ago),
        true,
        "report.pdf".to_string(),
        "application/pdf".to_string(),
        2048,
    )
    .unwrap()
}

/// A record that has not yet expired.
pub fn active_record(provider: StorageProvider, backend_id: Option<&str>) -> CleanupRecord {
    let now = Utc::now();
    CleanupRecord::new(
        Uuid::new_v4(),
        "session-1".to_string(),
        backend_id.map(String::from),
        provider,
        now,
        now + Duration::hours(24),
        true,
        "report.pdf".to_string(),
        "application/pdf".to_string(),
        2048,
    )
    .unwrap()
}
