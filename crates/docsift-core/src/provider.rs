use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage provider types
///
/// This enum defines the available storage providers. It's defined in core
/// because it's used in configuration, the ledger, and upload descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Cloud,
    Chunked,
    Local,
}

impl FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cloud" => Ok(StorageProvider::Cloud),
            "chunked" => Ok(StorageProvider::Chunked),
            "local" => Ok(StorageProvider::Local),
            _ => Err(anyhow::anyhow!("Invalid storage provider: {}", s)),
        }
    }
}

impl Display for StorageProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageProvider::Cloud => write!(f, "cloud"),
            StorageProvider::Chunked => write!(f, "chunked"),
            StorageProvider::Local => write!(f, "local"),
        }
    }
}
