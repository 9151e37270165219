use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::provider::StorageProvider;

/// Durable record of one upload and its cleanup state.
///
/// Keyed by `document_id`: the ledger holds at most one row per document, and
/// re-inserting upserts the row and resets `cleaned`. `cleaned` transitions
/// only false -> true, and only the garbage collector flips it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupRecord {
    pub document_id: Uuid,
    pub session_id: String,
    /// Backend-specific id to delete by; None for the local fallback.
    pub backend_id: Option<String>,
    pub storage_provider: StorageProvider,
    pub uploaded_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_anonymous: bool,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub cleaned: bool,
}

impl CleanupRecord {
    /// Build a new, uncleaned record. Rejects `expires_at <= uploaded_at`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        document_id: Uuid,
        session_id: String,
        backend_id: Option<String>,
        storage_provider: StorageProvider,
        uploaded_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        is_anonymous: bool,
        file_name: String,
        file_type: String,
        file_size: i64,
    ) -> Result<Self, AppError> {
        if expires_at <= uploaded_at {
            return Err(AppError::InvalidInput(format!(
                "expires_at {} must be after uploaded_at {}",
                expires_at, uploaded_at
            )));
        }
        Ok(CleanupRecord {
            document_id,
            session_id,
            backend_id,
            storage_provider,
            uploaded_at,
            expires_at,
            is_anonymous,
            file_name,
            file_type,
            file_size,
            cleaned: false,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Aggregate ledger counters for observability.
///
/// Invariants: `total == cleaned + pending` and `pending == expired + active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupStats {
    pub total: i64,
    pub cleaned: i64,
    pub pending: i64,
    pub expired: i64,
    pub active: i64,
}
