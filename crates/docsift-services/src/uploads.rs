//! Upload orchestration: store a file through the fallback chain and track
//! it in the cleanup ledger.

use chrono::{DateTime, Utc};
use docsift_core::models::{CleanupRecord, UploadDescriptor};
use docsift_core::StorageProvider;
use docsift_ledger::CleanupLedger;
use docsift_storage::{UploadCoordinator, UploadFile};
use std::sync::Arc;
use uuid::Uuid;

/// How an upload should be tracked for later cleanup. Expiry policy is the
/// caller's: anonymous sessions get short TTLs, authenticated ones may get
/// effectively none.
#[derive(Debug, Clone)]
pub struct UploadTracking {
    pub document_id: Uuid,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
    pub is_anonymous: bool,
}

#[derive(Clone)]
pub struct UploadService {
    storage: Arc<UploadCoordinator>,
    ledger: Arc<CleanupLedger>,
}

impl UploadService {
    pub fn new(storage: Arc<UploadCoordinator>, ledger: Arc<CleanupLedger>) -> Self {
        Self { storage, ledger }
    }

    /// Upload a file and record it in the ledger.
    ///
    /// Never fails the user-facing path. A ledger write failure after a
    /// successful upload leaves an orphaned file (stored, untracked); that
    /// is logged here rather than propagated, and no reconciliation job
    /// exists to recover it later.
    #[tracing::instrument(skip(self, file, tracking), fields(document_id = %tracking.document_id, file_name = %file.file_name))]
    pub async fn upload_tracked(
        &self,
        file: &UploadFile,
        tracking: UploadTracking,
    ) -> UploadDescriptor {
        let descriptor = self.storage.upload(file).await;
        let uploaded_at = Utc::now();

        let backend_id = (descriptor.storage_provider != StorageProvider::Local)
            .then(|| descriptor.file_id.clone());

        let record = match CleanupRecord::new(
            tracking.document_id,
            tracking.session_id,
            backend_id,
            descriptor.storage_provider,
            uploaded_at,
            tracking.expires_at,
            tracking.is_anonymous,
            descriptor.file_name.clone(),
            descriptor.file_type.clone(),
            descriptor.size,
        ) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    document_id = %tracking.document_id,
                    file_id = %descriptor.file_id,
                    provider = %descriptor.storage_provider,
                    "Rejected cleanup record for upload; file is stored but untracked"
                );
                return descriptor;
            }
        };

        if let Err(e) = self.ledger.add_record(&record).await {
            tracing::warn!(
                error = %e,
                document_id = %record.document_id,
                file_id = %descriptor.file_id,
                provider = %descriptor.storage_provider,
                "Ledger write failed after successful upload; file is stored but untracked"
            );
        }

        descriptor
    }
}
