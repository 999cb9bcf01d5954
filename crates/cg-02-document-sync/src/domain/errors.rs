//! # Sync Errors

use cg_01_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a sync. Fatal to startup.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The document directory itself could not be listed.
    #[error("Cannot read document directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured path exists but is not a directory.
    #[error("Document path {} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// The catalog could not be read or written.
    #[error("Store error during sync: {0}")]
    Store(#[from] StoreError),
}

/// A single entry skipped during the scan. Logged, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Skipped {}: {reason}", path.display())]
pub struct SyncWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl SyncWarning {
    pub fn new(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
