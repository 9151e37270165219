//! Cloud object store backend (S3-compatible).

use crate::keys;
use crate::traits::{DeleteOutcome, DocumentStore, StorageError, StorageResult, UploadFile};
use async_trait::async_trait;
use chrono::Utc;
use docsift_core::config::CloudCredentials;
use docsift_core::models::UploadDescriptor;
use docsift_core::StorageProvider;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};

const DEFAULT_REGION: &str = "us-east-1";

struct CloudInner {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

/// S3-compatible cloud storage backend.
///
/// Constructed unconfigured when the credential triplet is incomplete; the
/// coordinator skips it in that state without ever issuing a network call.
pub struct CloudStore {
    inner: Option<CloudInner>,
}

impl CloudStore {
    /// Create a new CloudStore. `credentials` is the full triplet from
    /// configuration, or None when the cloud backend is not configured.
    pub fn new(credentials: Option<&CloudCredentials>) -> StorageResult<Self> {
        let Some(creds) = credentials else {
            return Ok(CloudStore { inner: None });
        };

        let region = creds
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(creds.bucket.clone())
            .with_region(region.clone())
            .with_access_key_id(creds.access_key_id.clone())
            .with_secret_access_key(creds.secret_access_key.clone());

        if let Some(ref endpoint) = creds.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(CloudStore {
            inner: Some(CloudInner {
                store,
                bucket: creds.bucket.clone(),
                region,
                endpoint: creds.endpoint.clone(),
            }),
        })
    }

    fn configured(&self) -> StorageResult<&CloudInner> {
        self.inner
            .as_ref()
            .ok_or_else(|| StorageError::Unconfigured("cloud".to_string()))
    }
}

impl CloudInner {
    /// Generate the browsable URL for an object key.
    ///
    /// With a custom endpoint, uses path-style for S3-compatible provider
    /// compatibility: `{endpoint}/{bucket}/{key}`. Otherwise the standard
    /// AWS virtual-hosted form.
    fn object_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl DocumentStore for CloudStore {
    fn provider(&self) -> StorageProvider {
        StorageProvider::Cloud
    }

    fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    async fn upload(&self, file: &UploadFile) -> StorageResult<UploadDescriptor> {
        let inner = self.configured()?;
        let key = keys::cloud_object_key(&file.file_name, Utc::now());
        let location = Path::from(key.clone());
        let sent = file.data.len() as u64;
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = inner
            .store
            .put(&location, PutPayload::from(file.data.clone()))
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %inner.bucket,
                key = %key,
                size_bytes = sent,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloud upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        // Size as reported by the provider, not as measured client-side,
        // so a partial transfer shows up as a mismatch.
        let meta = inner
            .store
            .head(&location)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        let stored = meta.size as u64;

        if stored != sent {
            tracing::warn!(
                bucket = %inner.bucket,
                key = %key,
                sent_bytes = sent,
                stored_bytes = stored,
                "Provider-reported size differs from bytes sent"
            );
        }

        let url = inner.object_url(&key);

        tracing::info!(
            bucket = %inner.bucket,
            key = %key,
            size_bytes = stored,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloud upload successful"
        );

        Ok(UploadDescriptor {
            file_id: key.clone(),
            url,
            public_id: Some(key),
            size: stored as i64,
            file_name: file.file_name.clone(),
            file_type: file.content_type.clone(),
            storage_provider: StorageProvider::Cloud,
        })
    }

    async fn delete(&self, file_id: &str) -> StorageResult<DeleteOutcome> {
        let inner = self.configured()?;
        let location = Path::from(file_id.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = inner.store.delete(&location).await;

        match result {
            Ok(_) => {
                tracing::info!(
                    bucket = %inner.bucket,
                    key = %file_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloud delete successful"
                );
                Ok(DeleteOutcome::Deleted)
            }
            Err(ObjectStoreError::NotFound { .. }) => Ok(DeleteOutcome::NotFound),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %inner.bucket,
                    key = %file_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloud delete failed"
                );
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    async fn download(&self, file_id: &str) -> StorageResult<Vec<u8>> {
        let inner = self.configured()?;
        let location = Path::from(file_id.to_string());

        let result: ObjectResult<_> = inner.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(file_id.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    fn resolve_url(&self, file_id: &str) -> String {
        match self.inner {
            Some(ref inner) => inner.object_url(file_id),
            None => String::new(),
        }
    }
}
