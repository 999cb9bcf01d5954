//! # Document Sync Service

#[cfg(test)]
mod tests;

use crate::domain::errors::SyncError;
use crate::domain::plan::SyncPlan;
use crate::domain::report::SyncReport;
use crate::ports::inbound::DocumentSyncApi;
use crate::ports::outbound::DocumentSource;
use async_trait::async_trait;
use cg_01_store::GatewayStoreApi;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reconciles a `DocumentSource` with the store catalog.
pub struct DocumentSyncService<S, G: ?Sized> {
    source: S,
    store: Arc<G>,
}

impl<S, G> DocumentSyncService<S, G>
where
    S: DocumentSource,
    G: GatewayStoreApi + ?Sized,
{
    pub fn new(source: S, store: Arc<G>) -> Self {
        Self { source, store }
    }

    async fn apply(&self, plan: SyncPlan) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport {
            unchanged: plan.unchanged,
            ..Default::default()
        };

        for (id, fingerprint) in plan.add {
            self.store.upsert_document(&id, fingerprint).await?;
            debug!(doc_id = %id, %fingerprint, "[cg-02] Document added");
            report.added.push(id);
        }
        for (id, fingerprint) in plan.update {
            self.store.upsert_document(&id, fingerprint).await?;
            debug!(doc_id = %id, %fingerprint, "[cg-02] Document updated");
            report.updated.push(id);
        }
        for id in plan.remove {
            self.store.delete_document(&id).await?;
            debug!(doc_id = %id, "[cg-02] Document removed");
            report.removed.push(id);
        }

        Ok(report)
    }
}

#[async_trait]
impl<S, G> DocumentSyncApi for DocumentSyncService<S, G>
where
    S: DocumentSource,
    G: GatewayStoreApi + ?Sized,
{
    async fn sync(&self) -> Result<SyncReport, SyncError> {
        let snapshot = self.source.scan()?;
        for warning in &snapshot.warnings {
            warn!("[cg-02] {}", warning);
        }

        let in_store: BTreeMap<_, _> = self
            .store
            .list_documents()
            .await?
            .into_iter()
            .map(|doc| (doc.id, doc.fingerprint))
            .collect();

        let plan = SyncPlan::compute(&snapshot.files, &in_store);
        let mut report = self.apply(plan).await?;
        report.skipped = snapshot.warnings;

        info!(
            added = report.added.len(),
            updated = report.updated.len(),
            removed = report.removed.len(),
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            "[cg-02] Document catalog synchronized"
        );
        Ok(report)
    }
}
