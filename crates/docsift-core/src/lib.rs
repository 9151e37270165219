//! Docsift Core Library
//!
//! This crate provides core domain models, error types, configuration, and the
//! storage provider enum that are shared across all docsift components.

pub mod config;
pub mod error;
pub mod models;
pub mod provider;

// Re-export commonly used types
pub use config::{ChunkStoreConfig, CloudCredentials, Config};
pub use error::AppError;
pub use provider::StorageProvider;
