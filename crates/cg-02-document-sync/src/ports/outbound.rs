use crate::domain::errors::{SyncError, SyncWarning};
use cg_01_store::Fingerprint;
use shared_types::DocId;
use std::collections::BTreeMap;

/// Fingerprinted files found by one scan.
#[derive(Debug, Clone, Default)]
pub struct DocumentSnapshot {
    pub files: BTreeMap<DocId, Fingerprint>,
    pub warnings: Vec<SyncWarning>,
}

/// Enumerates the documents to track.
///
/// Runs before events are served, so implementations may block.
pub trait DocumentSource: Send + Sync {
    /// Deterministic, repeatable snapshot. Per-file failures go into
    /// `warnings`; failure to enumerate the source itself is an error.
    fn scan(&self) -> Result<DocumentSnapshot, SyncError>;
}
