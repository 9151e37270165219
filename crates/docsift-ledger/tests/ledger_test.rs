//! Integration tests for the cleanup ledger against a real on-disk database.

use chrono::{DateTime, Duration, Utc};
use docsift_core::models::CleanupRecord;
use docsift_core::StorageProvider;
use docsift_ledger::CleanupLedger;
use tempfile::tempdir;
use uuid::Uuid;

fn record(
    document_id: Uuid,
    session_id: &str,
    uploaded_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> CleanupRecord {
    CleanupRecord::new(
        document_id,
        session_id.to_string(),
        Some(format!("documents/{}-report.pdf", uploaded_at.timestamp_millis())),
        StorageProvider::Cloud,
        uploaded_at,
        expires_at,
        true,
        "report.pdf".to_string(),
        "application/pdf".to_string(),
        2048,
    )
    .unwrap()
}

fn expired_record(document_id: Uuid, session_id: &str, hours_ago: i64) -> CleanupRecord {
    let now = Utc::now();
    record(
        document_id,
        session_id,
        now - Duration::hours(hours_ago + 1),
        now - Duration::hours(hours_ago),
    )
}

fn active_record(document_id: Uuid, session_id: &str) -> CleanupRecord {
    let now = Utc::now();
    record(document_id, session_id, now, now + Duration::hours(24))
}

#[tokio::test]
async fn test_reinsert_upserts_and_resets_cleaned() {
    let dir = tempdir().unwrap();
    let ledger = CleanupLedger::open(dir.path()).await.unwrap();

    let document_id = Uuid::new_v4();
    let mut first = expired_record(document_id, "session-1", 1);
    first.file_name = "draft.pdf".to_string();
    ledger.add_record(&first).await.unwrap();
    ledger.mark_cleaned(document_id).await.unwrap();

    let mut second = expired_record(document_id, "session-1", 1);
    second.file_name = "final.pdf".to_string();
    ledger.add_record(&second).await.unwrap();

    // One row, carrying the second call's fields, uncleaned again.
    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.cleaned, 0);

    let expired = ledger.get_expired().await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].file_name, "final.pdf");
    assert!(!expired[0].cleaned);
}

#[tokio::test]
async fn test_expired_query_excludes_cleaned_and_unexpired() {
    let dir = tempdir().unwrap();
    let ledger = CleanupLedger::open(dir.path()).await.unwrap();

    let expired_id = Uuid::new_v4();
    ledger
        .add_record(&expired_record(expired_id, "session-1", 2))
        .await
        .unwrap();
    ledger
        .add_record(&active_record(Uuid::new_v4(), "session-1"))
        .await
        .unwrap();

    let expired = ledger.get_expired().await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].document_id, expired_id);

    ledger.mark_cleaned(expired_id).await.unwrap();
    assert!(ledger.get_expired().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expired_ordered_oldest_first() {
    let dir = tempdir().unwrap();
    let ledger = CleanupLedger::open(dir.path()).await.unwrap();

    let newer = Uuid::new_v4();
    let older = Uuid::new_v4();
    ledger
        .add_record(&expired_record(newer, "session-1", 1))
        .await
        .unwrap();
    ledger
        .add_record(&expired_record(older, "session-1", 48))
        .await
        .unwrap();

    let expired = ledger.get_expired().await.unwrap();
    let ids: Vec<Uuid> = expired.iter().map(|r| r.document_id).collect();
    assert_eq!(ids, vec![older, newer]);
}

#[tokio::test]
async fn test_mark_cleaned_is_idempotent() {
    let dir = tempdir().unwrap();
    let ledger = CleanupLedger::open(dir.path()).await.unwrap();

    let document_id = Uuid::new_v4();
    ledger
        .add_record(&expired_record(document_id, "session-1", 1))
        .await
        .unwrap();

    ledger.mark_cleaned(document_id).await.unwrap();
    ledger.mark_cleaned(document_id).await.unwrap();

    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.cleaned, 1);
}

#[tokio::test]
async fn test_session_listing_is_active_only() {
    let dir = tempdir().unwrap();
    let ledger = CleanupLedger::open(dir.path()).await.unwrap();

    let mine = Uuid::new_v4();
    let cleaned = Uuid::new_v4();
    ledger
        .add_record(&active_record(mine, "session-1"))
        .await
        .unwrap();
    ledger
        .add_record(&active_record(cleaned, "session-1"))
        .await
        .unwrap();
    ledger
        .add_record(&active_record(Uuid::new_v4(), "session-2"))
        .await
        .unwrap();
    ledger.mark_cleaned(cleaned).await.unwrap();

    let records = ledger.get_by_session("session-1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document_id, mine);
}

#[tokio::test]
async fn test_prune_removes_only_old_cleaned_rows() {
    let dir = tempdir().unwrap();
    let ledger = CleanupLedger::open(dir.path()).await.unwrap();

    // Cleaned and expired 40 days ago: prunable.
    let prunable = Uuid::new_v4();
    ledger
        .add_record(&expired_record(prunable, "session-1", 40 * 24))
        .await
        .unwrap();
    ledger.mark_cleaned(prunable).await.unwrap();

    // Cleaned but expired recently: kept.
    let recent = Uuid::new_v4();
    ledger
        .add_record(&expired_record(recent, "session-1", 1))
        .await
        .unwrap();
    ledger.mark_cleaned(recent).await.unwrap();

    // Uncleaned, however old: never pruned.
    let uncleaned = Uuid::new_v4();
    ledger
        .add_record(&expired_record(uncleaned, "session-1", 90 * 24))
        .await
        .unwrap();

    let pruned = ledger.prune_older_than(30).await.unwrap();
    assert_eq!(pruned, 1);

    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.cleaned, 1);

    // The uncleaned row is still visible to the sweep path.
    let expired = ledger.get_expired().await.unwrap();
    assert!(expired.iter().any(|r| r.document_id == uncleaned));
}

#[tokio::test]
async fn test_stats_invariants() {
    let dir = tempdir().unwrap();
    let ledger = CleanupLedger::open(dir.path()).await.unwrap();

    ledger
        .add_record(&expired_record(Uuid::new_v4(), "session-1", 1))
        .await
        .unwrap();
    ledger
        .add_record(&active_record(Uuid::new_v4(), "session-1"))
        .await
        .unwrap();
    let done = Uuid::new_v4();
    ledger
        .add_record(&expired_record(done, "session-2", 2))
        .await
        .unwrap();
    ledger.mark_cleaned(done).await.unwrap();

    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.total, stats.cleaned + stats.pending);
    assert_eq!(stats.pending, stats.expired + stats.active);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.active, 1);
}

#[tokio::test]
async fn test_ledger_survives_reopen() {
    let dir = tempdir().unwrap();
    let document_id = Uuid::new_v4();

    {
        let ledger = CleanupLedger::open(dir.path()).await.unwrap();
        ledger
            .add_record(&expired_record(document_id, "session-1", 1))
            .await
            .unwrap();
    }

    let reopened = CleanupLedger::open(dir.path()).await.unwrap();
    let expired = reopened.get_expired().await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].document_id, document_id);
}

#[tokio::test]
async fn test_open_creates_missing_data_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("var").join("docsift");

    let ledger = CleanupLedger::open(&nested).await.unwrap();
    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.total, 0);
    assert!(nested.join("cleanup.db").exists());
}
