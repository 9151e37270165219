//! Configuration module
//!
//! This module provides configuration for the storage subsystem: cloud
//! credentials, the chunked-store connection, the ledger data directory, and
//! sweep policy. Backend selection is driven entirely by which credentials
//! are present in the environment; there is no flag to force a backend.

use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_RETENTION_DAYS: i64 = 30;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;
const DEFAULT_ANONYMOUS_TTL_HOURS: i64 = 24;

/// Credentials for the S3-compatible cloud object store.
///
/// Only constructed when the full triplet (bucket, access key, secret key)
/// is present; a partial triplet leaves the cloud backend unconfigured.
#[derive(Clone, Debug)]
pub struct CloudCredentials {
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

/// Connection settings for the chunked database store.
#[derive(Clone, Debug)]
pub struct ChunkStoreConfig {
    pub url: String,
    pub database: String,
}

/// Application configuration for the storage subsystem.
#[derive(Clone, Debug)]
pub struct Config {
    pub s3_bucket: Option<String>,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub chunk_db_url: Option<String>,
    pub chunk_db_name: Option<String>,
    pub data_dir: PathBuf,
    pub retention_days: i64,
    pub sweep_interval_secs: u64,
    pub anonymous_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config = Config {
            s3_bucket: env::var("DOCSIFT_S3_BUCKET").ok(),
            s3_access_key_id: env::var("DOCSIFT_S3_ACCESS_KEY_ID")
                .or_else(|_| env::var("AWS_ACCESS_KEY_ID"))
                .ok(),
            s3_secret_access_key: env::var("DOCSIFT_S3_SECRET_ACCESS_KEY")
                .or_else(|_| env::var("AWS_SECRET_ACCESS_KEY"))
                .ok(),
            s3_region: env::var("DOCSIFT_S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("DOCSIFT_S3_ENDPOINT").ok(),
            chunk_db_url: env::var("DOCSIFT_CHUNK_DB_URL").ok(),
            chunk_db_name: env::var("DOCSIFT_CHUNK_DB_NAME").ok(),
            data_dir: env::var("DOCSIFT_DATA_DIR")
                .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
                .into(),
            retention_days: env::var("DOCSIFT_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETENTION_DAYS),
            sweep_interval_secs: env::var("DOCSIFT_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            anonymous_ttl_hours: env::var("DOCSIFT_ANONYMOUS_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ANONYMOUS_TTL_HOURS),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.retention_days < 1 {
            anyhow::bail!(
                "DOCSIFT_RETENTION_DAYS must be at least 1, got {}",
                self.retention_days
            );
        }
        if self.sweep_interval_secs == 0 {
            anyhow::bail!("DOCSIFT_SWEEP_INTERVAL_SECS must be greater than 0");
        }
        if self.anonymous_ttl_hours < 1 {
            anyhow::bail!(
                "DOCSIFT_ANONYMOUS_TTL_HOURS must be at least 1, got {}",
                self.anonymous_ttl_hours
            );
        }
        Ok(())
    }

    /// The full cloud credential triplet, if configured.
    pub fn cloud_credentials(&self) -> Option<CloudCredentials> {
        match (
            &self.s3_bucket,
            &self.s3_access_key_id,
            &self.s3_secret_access_key,
        ) {
            (Some(bucket), Some(access_key_id), Some(secret_access_key)) => {
                Some(CloudCredentials {
                    bucket: bucket.clone(),
                    access_key_id: access_key_id.clone(),
                    secret_access_key: secret_access_key.clone(),
                    region: self.s3_region.clone(),
                    endpoint: self.s3_endpoint.clone(),
                })
            }
            _ => None,
        }
    }

    /// True when some but not all of the cloud triplet is set. The chain
    /// treats this the same as unconfigured; callers may want to log it.
    pub fn has_partial_cloud_credentials(&self) -> bool {
        let present = [
            self.s3_bucket.is_some(),
            self.s3_access_key_id.is_some(),
            self.s3_secret_access_key.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();
        present > 0 && present < 3
    }

    /// Chunked-store connection settings, if configured.
    pub fn chunk_store(&self) -> Option<ChunkStoreConfig> {
        match (&self.chunk_db_url, &self.chunk_db_name) {
            (Some(url), Some(database)) => Some(ChunkStoreConfig {
                url: url.clone(),
                database: database.clone(),
            }),
            _ => None,
        }
    }

    /// Path of the embedded ledger database file.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("cleanup.db")
    }

    /// Expiry timestamp for an anonymous upload made at `uploaded_at`.
    pub fn anonymous_expires_at(&self, uploaded_at: DateTime<Utc>) -> DateTime<Utc> {
        uploaded_at + Duration::hours(self.anonymous_ttl_hours)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            s3_bucket: None,
            s3_access_key_id: None,
            s3_secret_access_key: None,
            s3_region: None,
            s3_endpoint: None,
            chunk_db_url: None,
            chunk_db_name: None,
            data_dir: DEFAULT_DATA_DIR.into(),
            retention_days: DEFAULT_RETENTION_DAYS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            anonymous_ttl_hours: DEFAULT_ANONYMOUS_TTL_HOURS,
        }
    }
}
