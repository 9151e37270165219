//! Cleanup ledger repository: CRUD for the cleanup_records table.

use chrono::{Duration, Utc};
use docsift_core::models::{CleanupRecord, CleanupStats};
use docsift_core::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cleanup_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id TEXT NOT NULL UNIQUE,
    session_id TEXT NOT NULL,
    backend_id TEXT,
    storage_provider TEXT NOT NULL,
    uploaded_at TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    is_anonymous INTEGER NOT NULL,
    file_name TEXT NOT NULL,
    file_type TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    cleaned INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);
CREATE INDEX IF NOT EXISTS idx_cleanup_expiry ON cleanup_records (expires_at, cleaned);
CREATE INDEX IF NOT EXISTS idx_cleanup_session ON cleanup_records (session_id, is_anonymous);
"#;

const RECORD_COLUMNS: &str = "document_id, session_id, backend_id, storage_provider, \
     uploaded_at, expires_at, is_anonymous, file_name, file_type, file_size, cleaned";

/// Row type for the cleanup_records table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct CleanupRecordRow {
    document_id: String,
    session_id: String,
    backend_id: Option<String>,
    storage_provider: String,
    uploaded_at: chrono::DateTime<Utc>,
    expires_at: chrono::DateTime<Utc>,
    is_anonymous: bool,
    file_name: String,
    file_type: String,
    file_size: i64,
    cleaned: bool,
}

impl CleanupRecordRow {
    fn into_record(self) -> Result<CleanupRecord, AppError> {
        let document_id = Uuid::parse_str(&self.document_id).map_err(|e| {
            AppError::Internal(format!(
                "Ledger row has malformed document_id {}: {}",
                self.document_id, e
            ))
        })?;
        let storage_provider = self
            .storage_provider
            .parse()
            .map_err(|e: anyhow::Error| AppError::Internal(e.to_string()))?;
        Ok(CleanupRecord {
            document_id,
            session_id: self.session_id,
            backend_id: self.backend_id,
            storage_provider,
            uploaded_at: self.uploaded_at,
            expires_at: self.expires_at,
            is_anonymous: self.is_anonymous,
            file_name: self.file_name,
            file_type: self.file_type,
            file_size: self.file_size,
            cleaned: self.cleaned,
        })
    }
}

/// Embedded ledger of uploads and their cleanup state.
///
/// One writer at a time: the pool is capped at a single connection and the
/// database runs in WAL mode, so the store's own locking is the concurrency
/// control (per the subsystem's single-writer model).
#[derive(Clone)]
pub struct CleanupLedger {
    pool: Pool<Sqlite>,
}

impl CleanupLedger {
    /// Open (creating if absent) the ledger at `{data_dir}/cleanup.db`.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Config(format!(
                "Failed to create ledger data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;
        Self::open_file(&data_dir.join("cleanup.db")).await
    }

    /// Open a ledger database at an explicit file path.
    pub async fn open_file(path: &Path) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let ledger = CleanupLedger { pool };
        ledger.migrate().await?;

        tracing::debug!(path = %path.display(), "Cleanup ledger opened");
        Ok(ledger)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Upsert a record keyed by `document_id`. A re-insert replaces the row
    /// and resets `cleaned`, so a re-uploaded document is tracked afresh.
    #[tracing::instrument(skip(self, record), fields(db.table = "cleanup_records", document_id = %record.document_id))]
    pub async fn add_record(&self, record: &CleanupRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO cleanup_records (
                document_id, session_id, backend_id, storage_provider, uploaded_at,
                expires_at, is_anonymous, file_name, file_type, file_size, cleaned
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0)
            ON CONFLICT(document_id) DO UPDATE SET
                session_id = excluded.session_id,
                backend_id = excluded.backend_id,
                storage_provider = excluded.storage_provider,
                uploaded_at = excluded.uploaded_at,
                expires_at = excluded.expires_at,
                is_anonymous = excluded.is_anonymous,
                file_name = excluded.file_name,
                file_type = excluded.file_type,
                file_size = excluded.file_size,
                cleaned = 0
            "#,
        )
        .bind(record.document_id.to_string())
        .bind(&record.session_id)
        .bind(&record.backend_id)
        .bind(record.storage_provider.to_string())
        .bind(record.uploaded_at)
        .bind(record.expires_at)
        .bind(record.is_anonymous)
        .bind(&record.file_name)
        .bind(&record.file_type)
        .bind(record.file_size)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All expired, uncleaned records, oldest upload first so a large
    /// backlog drains in bounded order.
    #[tracing::instrument(skip(self), fields(db.table = "cleanup_records"))]
    pub async fn get_expired(&self) -> Result<Vec<CleanupRecord>, AppError> {
        let rows: Vec<CleanupRecordRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cleanup_records \
             WHERE expires_at <= ?1 AND cleaned = 0 \
             ORDER BY uploaded_at ASC",
            RECORD_COLUMNS
        ))
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|r| r.into_record()).collect()
    }

    /// Active (uncleaned) records for a session, for "your uploads" listings
    /// without touching any backend.
    #[tracing::instrument(skip(self), fields(db.table = "cleanup_records", session_id = %session_id))]
    pub async fn get_by_session(&self, session_id: &str) -> Result<Vec<CleanupRecord>, AppError> {
        let rows: Vec<CleanupRecordRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cleanup_records \
             WHERE session_id = ?1 AND cleaned = 0 \
             ORDER BY uploaded_at ASC",
            RECORD_COLUMNS
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|r| r.into_record()).collect()
    }

    /// Mark a record cleaned. Idempotent: marking an already-cleaned record
    /// is a no-op.
    #[tracing::instrument(skip(self), fields(db.table = "cleanup_records", document_id = %document_id))]
    pub async fn mark_cleaned(&self, document_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE cleanup_records SET cleaned = 1 WHERE document_id = ?1")
            .bind(document_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete cleaned rows whose expiry precedes `now - days`, bounding
    /// table growth independent of sweep frequency. Returns the count.
    #[tracing::instrument(skip(self), fields(db.table = "cleanup_records", retention_days = days))]
    pub async fn prune_older_than(&self, days: i64) -> Result<u64, AppError> {
        let cutoff = Utc::now() - Duration::days(days);
        let result =
            sqlx::query("DELETE FROM cleanup_records WHERE cleaned = 1 AND expires_at < ?1")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Aggregate counters: `total == cleaned + pending`,
    /// `pending == expired + active`.
    #[tracing::instrument(skip(self), fields(db.table = "cleanup_records"))]
    pub async fn stats(&self) -> Result<CleanupStats, AppError> {
        let (total, cleaned, expired): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(cleaned), 0),
                COALESCE(SUM(CASE WHEN cleaned = 0 AND expires_at <= ?1 THEN 1 ELSE 0 END), 0)
            FROM cleanup_records
            "#,
        )
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let pending = total - cleaned;
        Ok(CleanupStats {
            total,
            cleaned,
            pending,
            expired,
            active: pending - expired,
        })
    }
}
