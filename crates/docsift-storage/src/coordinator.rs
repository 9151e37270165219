//! Upload coordinator: ordered fallback over the backend chain.

use crate::local::LocalStore;
use crate::traits::{DeleteOutcome, DocumentStore, StorageError, StorageResult, UploadFile};
use docsift_core::models::UploadDescriptor;
use docsift_core::{Config, StorageProvider};
use std::sync::Arc;

/// Routes uploads through an ordered chain of backends and dispatches
/// deletes/URL lookups by the provider tag recorded at upload time.
///
/// `upload` is deliberately infallible: storage being unavailable degrades
/// durability but must never break the user-facing request.
#[derive(Clone)]
pub struct UploadCoordinator {
    backends: Vec<Arc<dyn DocumentStore>>,
}

impl UploadCoordinator {
    /// Build a coordinator over an explicit chain. Backends are tried in
    /// order; the local no-op terminal is appended if the chain lacks one.
    pub fn new(mut backends: Vec<Arc<dyn DocumentStore>>) -> Self {
        let has_local = backends
            .iter()
            .any(|b| b.provider() == StorageProvider::Local);
        if !has_local {
            backends.push(Arc::new(LocalStore));
        }
        UploadCoordinator { backends }
    }

    /// Build the standard chain (cloud, chunked, local) from configuration.
    /// Which backends participate is driven entirely by credential presence.
    pub fn from_config(config: &Config) -> StorageResult<Self> {
        let mut backends: Vec<Arc<dyn DocumentStore>> = Vec::new();

        if config.has_partial_cloud_credentials() {
            tracing::warn!(
                "Cloud storage credentials are partially configured; cloud backend disabled"
            );
        }

        #[cfg(feature = "storage-cloud")]
        backends.push(Arc::new(crate::cloud::CloudStore::new(
            config.cloud_credentials().as_ref(),
        )?));

        #[cfg(not(feature = "storage-cloud"))]
        if config.cloud_credentials().is_some() {
            tracing::warn!(
                "Cloud credentials set but the storage-cloud feature is not enabled; ignoring"
            );
        }

        #[cfg(feature = "storage-chunked")]
        backends.push(Arc::new(crate::chunked::ChunkedStore::new(
            config.chunk_store().as_ref(),
        )?));

        #[cfg(not(feature = "storage-chunked"))]
        if config.chunk_store().is_some() {
            tracing::warn!(
                "Chunk store configured but the storage-chunked feature is not enabled; ignoring"
            );
        }

        Ok(Self::new(backends))
    }

    fn backend_for(&self, provider: StorageProvider) -> Option<&Arc<dyn DocumentStore>> {
        self.backends.iter().find(|b| b.provider() == provider)
    }

    /// Upload through the chain. Unconfigured backends are skipped (routing,
    /// not an error); failures advance to the next candidate. Worst case the
    /// file is not durably stored and the returned descriptor says so.
    pub async fn upload(&self, file: &UploadFile) -> UploadDescriptor {
        for backend in &self.backends {
            let provider = backend.provider();

            if !backend.is_configured() {
                tracing::debug!(provider = %provider, "Skipping unconfigured storage backend");
                continue;
            }

            match backend.upload(file).await {
                Ok(descriptor) => {
                    tracing::info!(
                        provider = %provider,
                        file_id = %descriptor.file_id,
                        file_name = %descriptor.file_name,
                        size_bytes = descriptor.size,
                        "Upload stored"
                    );
                    return descriptor;
                }
                Err(StorageError::Unconfigured(_)) => {
                    tracing::debug!(provider = %provider, "Skipping unconfigured storage backend");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        provider = %provider,
                        file_name = %file.file_name,
                        "Upload failed, falling through to next backend"
                    );
                }
            }
        }

        tracing::warn!(
            file_name = %file.file_name,
            "No storage backend accepted the upload; returning metadata-only descriptor"
        );
        LocalStore::describe(file)
    }

    /// Delete by the provider tag recorded at upload time. `Local` is a
    /// no-op: nothing was stored.
    pub async fn delete(
        &self,
        file_id: &str,
        provider: StorageProvider,
    ) -> StorageResult<DeleteOutcome> {
        if provider == StorageProvider::Local {
            return Ok(DeleteOutcome::NotFound);
        }
        let backend = self.backend_for(provider).ok_or_else(|| {
            StorageError::BackendError(format!("No backend registered for provider {}", provider))
        })?;
        backend.delete(file_id).await
    }

    /// Read a file back from the backend that stored it.
    pub async fn download(
        &self,
        file_id: &str,
        provider: StorageProvider,
    ) -> StorageResult<Vec<u8>> {
        let backend = self.backend_for(provider).ok_or_else(|| {
            StorageError::BackendError(format!("No backend registered for provider {}", provider))
        })?;
        backend.download(file_id).await
    }

    /// Resolve the URL for a stored file; empty when the provider has no URL
    /// scheme (local) or is not registered.
    pub fn resolve_url(&self, file_id: &str, provider: StorageProvider) -> String {
        match self.backend_for(provider) {
            Some(backend) => backend.resolve_url(file_id),
            None => String::new(),
        }
    }
}
