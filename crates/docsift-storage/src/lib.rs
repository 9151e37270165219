//! Docsift Storage Library
//!
//! This crate provides the document storage abstraction and implementations
//! for docsift: the `DocumentStore` trait, the cloud (S3-compatible),
//! chunked-database, and local no-op backends, and the `UploadCoordinator`
//! that walks the ordered fallback chain.
//!
//! # Fallback chain
//!
//! Uploads try the cloud backend first, then the chunked database store, and
//! finally degrade to the local no-op backend. A backend participates only
//! when its credentials are configured; upload failures advance the chain
//! instead of propagating. The coordinator therefore never returns an error
//! from `upload` — the worst case is a metadata-only local descriptor with an
//! empty URL.

#[cfg(feature = "storage-chunked")]
pub mod chunked;
#[cfg(feature = "storage-cloud")]
pub mod cloud;
pub mod coordinator;
pub(crate) mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-chunked")]
pub use chunked::ChunkedStore;
#[cfg(feature = "storage-cloud")]
pub use cloud::CloudStore;
pub use coordinator::UploadCoordinator;
pub use docsift_core::StorageProvider;
pub use local::LocalStore;
pub use traits::{DeleteOutcome, DocumentStore, StorageError, StorageResult, UploadFile};
