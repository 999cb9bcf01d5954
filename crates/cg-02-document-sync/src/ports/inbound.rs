use crate::domain::errors::SyncError;
use crate::domain::report::SyncReport;
use async_trait::async_trait;

/// One-shot catalog reconciliation.
#[async_trait]
pub trait DocumentSyncApi: Send + Sync {
    /// Make the catalog mirror the current directory snapshot.
    async fn sync(&self) -> Result<SyncReport, SyncError>;
}
