//! Garbage-collector sweep over expired, uncleaned uploads.

use docsift_core::models::{CleanupRecord, CleanupStats};
use docsift_core::StorageProvider;
use docsift_ledger::CleanupLedger;
use docsift_storage::{DeleteOutcome, UploadCoordinator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::interval;

/// Counters from one sweep, alongside the post-sweep ledger stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub scanned: usize,
    pub cleaned: usize,
    pub failed: usize,
    pub pruned: u64,
    pub stats: CleanupStats,
}

/// Reclaims storage from expired, unauthenticated uploads.
///
/// Per record: delete from the backend recorded at upload time, then flip
/// `cleaned`. A failed delete leaves the record for the next sweep; one
/// record's failure never aborts the batch. Deletes run sequentially to
/// bound concurrent load on the backends.
#[derive(Clone)]
pub struct SweepService {
    ledger: Arc<CleanupLedger>,
    storage: Arc<UploadCoordinator>,
    /// Retention in days for cleaned rows before they are physically pruned.
    retention_days: i64,
    /// Serializes sweeps within this process; sweeps are non-reentrant.
    sweep_gate: Arc<Mutex<()>>,
}

impl SweepService {
    pub fn new(
        ledger: Arc<CleanupLedger>,
        storage: Arc<UploadCoordinator>,
        retention_days: i64,
    ) -> Self {
        Self {
            ledger,
            storage,
            retention_days,
            sweep_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Start the background sweep task.
    /// Returns a JoinHandle for graceful shutdown.
    pub fn start(self: Arc<Self>, interval_secs: u64) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(Duration::from_secs(interval_secs));

            loop {
                sweep_interval.tick().await;

                tracing::info!("Starting scheduled cleanup sweep");

                match self.run_sweep().await {
                    Ok(outcome) => {
                        tracing::info!(
                            scanned = outcome.scanned,
                            cleaned = outcome.cleaned,
                            failed = outcome.failed,
                            pruned = outcome.pruned,
                            "Cleanup sweep completed"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Cleanup sweep failed");
                    }
                }
            }
        })
    }

    /// Run one sweep over all currently expired, uncleaned records.
    #[tracing::instrument(skip(self), fields(sweep.operation = "reclaim_expired"))]
    pub async fn run_sweep(&self) -> Result<SweepOutcome, anyhow::Error> {
        let _guard = self.sweep_gate.lock().await;

        let expired = self.ledger.get_expired().await?;
        let scanned = expired.len();
        let mut cleaned = 0usize;
        let mut failed = 0usize;

        for record in &expired {
            if self.reclaim(record).await {
                cleaned += 1;
            } else {
                failed += 1;
            }
        }

        let pruned = self.ledger.prune_older_than(self.retention_days).await?;
        let stats = self.ledger.stats().await?;

        Ok(SweepOutcome {
            scanned,
            cleaned,
            failed,
            pruned,
            stats,
        })
    }

    /// Reclaim a single record. Returns true when the record ended cleaned.
    async fn reclaim(&self, record: &CleanupRecord) -> bool {
        let backend_id = match (record.storage_provider, &record.backend_id) {
            // Local records never stored anything; only the row remains.
            (StorageProvider::Local, _) => None,
            (_, Some(id)) => Some(id.clone()),
            (provider, None) => {
                tracing::debug!(
                    document_id = %record.document_id,
                    provider = %provider,
                    "Expired record has no backend id to delete"
                );
                None
            }
        };

        if let Some(ref id) = backend_id {
            match self.storage.delete(id, record.storage_provider).await {
                Ok(DeleteOutcome::Deleted) => {
                    tracing::info!(
                        document_id = %record.document_id,
                        backend_id = %id,
                        provider = %record.storage_provider,
                        expires_at = ?record.expires_at,
                        "Deleted expired file from storage"
                    );
                }
                Ok(DeleteOutcome::NotFound) => {
                    tracing::debug!(
                        document_id = %record.document_id,
                        backend_id = %id,
                        provider = %record.storage_provider,
                        "Expired file already absent from storage"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        document_id = %record.document_id,
                        backend_id = %id,
                        provider = %record.storage_provider,
                        "Failed to delete expired file, leaving record for next sweep"
                    );
                    return false;
                }
            }
        }

        match self.ledger.mark_cleaned(record.document_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    document_id = %record.document_id,
                    "Failed to mark record cleaned"
                );
                false
            }
        }
    }
}
