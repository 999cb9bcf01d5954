use super::errors::SyncWarning;
use shared_types::DocId;

/// What a sync run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// New catalog entries.
    pub added: Vec<DocId>,
    /// Entries whose fingerprint changed.
    pub updated: Vec<DocId>,
    /// Entries whose file is gone.
    pub removed: Vec<DocId>,
    /// Entries left untouched.
    pub unchanged: usize,
    /// Files that could not be read.
    pub skipped: Vec<SyncWarning>,
}

impl SyncReport {
    /// Number of store writes performed.
    pub fn writes(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }

    pub fn is_noop(&self) -> bool {
        self.writes() == 0
    }
}
