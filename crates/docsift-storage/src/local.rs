//! Local no-op backend: the terminal fallback of the chain.
//!
//! Performs no network call and stores nothing. The descriptor it returns
//! has an empty URL and a client-measured size; callers must treat it as
//! "metadata only, file not durably stored".

use crate::traits::{DeleteOutcome, DocumentStore, StorageError, StorageResult, UploadFile};
use async_trait::async_trait;
use docsift_core::models::UploadDescriptor;
use docsift_core::StorageProvider;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct LocalStore;

impl LocalStore {
    /// Build the degraded descriptor for a file that was not durably stored.
    pub fn describe(file: &UploadFile) -> UploadDescriptor {
        UploadDescriptor {
            file_id: Uuid::new_v4().to_string(),
            url: String::new(),
            public_id: None,
            size: file.data.len() as i64,
            file_name: file.file_name.clone(),
            file_type: file.content_type.clone(),
            storage_provider: StorageProvider::Local,
        }
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    fn provider(&self) -> StorageProvider {
        StorageProvider::Local
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn upload(&self, file: &UploadFile) -> StorageResult<UploadDescriptor> {
        tracing::debug!(
            file_name = %file.file_name,
            size_bytes = file.data.len(),
            "Local backend returning metadata-only descriptor"
        );
        Ok(Self::describe(file))
    }

    async fn delete(&self, _file_id: &str) -> StorageResult<DeleteOutcome> {
        // Nothing was stored, so there is nothing to delete.
        Ok(DeleteOutcome::NotFound)
    }

    async fn download(&self, file_id: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(file_id.to_string()))
    }

    fn resolve_url(&self, _file_id: &str) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_local_upload_is_metadata_only() {
        let store = LocalStore;
        let file = UploadFile::new("a.pdf", "application/pdf", Bytes::from_static(b"hello"));

        let descriptor = store.upload(&file).await.unwrap();

        assert_eq!(descriptor.storage_provider, StorageProvider::Local);
        assert!(descriptor.url.is_empty());
        assert_eq!(descriptor.size, 5);
        assert!(descriptor.is_degraded());
    }

    #[tokio::test]
    async fn test_local_delete_is_noop() {
        let store = LocalStore;
        assert_eq!(
            store.delete("anything").await.unwrap(),
            DeleteOutcome::NotFound
        );
    }
}
