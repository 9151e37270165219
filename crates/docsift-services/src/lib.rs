//! Docsift Services Layer
//!
//! This crate hosts the garbage-collector sweep service and re-exports a
//! unified API from the storage and ledger crates so that an embedding
//! application depends on a single service facade.

pub mod sweep;
pub mod telemetry;
pub mod uploads;

pub use docsift_ledger::CleanupLedger;
pub use docsift_storage::{
    DeleteOutcome, DocumentStore, LocalStore, StorageError, StorageProvider, StorageResult,
    UploadCoordinator, UploadFile,
};
pub use sweep::{SweepOutcome, SweepService};
pub use telemetry::init_telemetry;
pub use uploads::{UploadService, UploadTracking};
