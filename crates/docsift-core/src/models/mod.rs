pub mod cleanup;
pub mod upload;

pub use cleanup::{CleanupRecord, CleanupStats};
pub use upload::UploadDescriptor;
