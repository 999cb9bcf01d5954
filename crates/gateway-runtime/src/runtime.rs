//! # Gateway Runtime
//!
//! ## Startup Sequence
//!
//! 1. Open (or create) the store at `storage.db_path`
//! 2. Mirror the document directory into the catalog (fatal on failure)
//! 3. Reconcile configured and stored privileged roles (never fatal)
//! 4. Attach the pipelines to both event channels
//!
//! ## Shutdown Sequence
//!
//! 1. Stop reading events (shutdown signal or source closed)
//! 2. Let queued and in-flight events finish, bounded by `drain_timeout`
//! 3. Log pipeline counters

use crate::adapters::EventSource;
use crate::config::GatewayConfig;
use anyhow::{Context, Result};
use cg_01_store::{FileGatewayStore, GatewayStoreApi, StoreConfig};
use cg_02_document_sync::{DirectoryScanner, DocumentSyncApi, DocumentSyncService, SyncReport};
use cg_03_role_reconciler::{Reconciliation, RoleReconciler};
use cg_04_pipeline::{
    ChannelPipelines, ConsentPrompt, EventDispatcher, HandlerRegistry, MetricsSnapshot,
    PipelineDeps,
};
use gateway_telemetry::log_event;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Owns the configuration and the shutdown signal.
pub struct GatewayRuntime {
    config: GatewayConfig,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

/// A started gateway: store open, catalog synced, pipelines attached.
pub struct Gateway {
    store: Arc<FileGatewayStore>,
    dispatcher: EventDispatcher,
    sync_report: SyncReport,
    reconciliation: Reconciliation,
}

/// What happened during shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownReport {
    /// False if events were still running at the drain deadline.
    pub drained: bool,
    pub messages: MetricsSnapshot,
    pub callbacks: MetricsSnapshot,
}

impl GatewayRuntime {
    pub fn new(config: GatewayConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the startup sequence and attach the pipelines.
    pub async fn start(
        &self,
        handlers: Arc<dyn HandlerRegistry>,
        prompt: Arc<dyn ConsentPrompt>,
    ) -> Result<Gateway> {
        info!("===========================================");
        info!("  Welcome to {}", self.config.bot.name);
        info!("===========================================");

        let store = Arc::new(self.open_store()?);
        let sync_report = self.sync_documents(&store).await?;

        let reconciliation = RoleReconciler::new(Arc::clone(&store))
            .reconcile(&self.config.roles.configured())
            .await;
        let roster = reconciliation.roster.clone();
        info!(
            "Ready. Admins: {} | Operators: {}",
            roster.admins_display(),
            roster.operators_display()
        );

        let deps = PipelineDeps {
            store: Arc::clone(&store) as Arc<dyn GatewayStoreApi>,
            handlers,
            prompt,
        };
        let pipelines = Arc::new(ChannelPipelines::new(&deps, &self.config.pipeline, roster));
        let dispatcher = EventDispatcher::new(pipelines);

        Ok(Gateway {
            store,
            dispatcher,
            sync_report,
            reconciliation,
        })
    }

    fn open_store(&self) -> Result<FileGatewayStore> {
        let db_path = &self.config.storage.db_path;
        let mut store_config = StoreConfig::new(db_path);
        store_config.sync_writes = self.config.storage.sync_writes;

        let store = FileGatewayStore::open(&store_config)
            .with_context(|| format!("Failed to open store at {}", db_path.display()))?;

        if store.was_created() {
            info!("Creating new database at {}", db_path.display());
        } else {
            info!("Existing database detected at {}", db_path.display());
        }
        Ok(store)
    }

    async fn sync_documents(&self, store: &Arc<FileGatewayStore>) -> Result<SyncReport> {
        let documents = &self.config.documents;
        info!("Synchronizing documents from {}", documents.dir.display());

        let scanner = DirectoryScanner::new(&documents.dir, documents.scan_options());
        let report = DocumentSyncService::new(scanner, Arc::clone(store))
            .sync()
            .await
            .with_context(|| {
                format!("Document synchronization failed for {}", documents.dir.display())
            })?;

        log_event!(
            info,
            "runtime",
            "Documents synchronized",
            added = report.added.len(),
            updated = report.updated.len(),
            removed = report.removed.len(),
            unchanged = report.unchanged,
            skipped = report.skipped.len()
        );
        Ok(report)
    }

    /// Feed events from `source` into the gateway until the source closes
    /// or shutdown is requested. Returns the number of events accepted.
    pub async fn serve<S: EventSource>(&self, gateway: &Gateway, mut source: S) -> usize {
        let mut shutdown = self.shutdown_rx.clone();
        let mut accepted = 0;

        if *shutdown.borrow() {
            return accepted;
        }

        loop {
            tokio::select! {
                event = source.next_event() => match event {
                    Some(event) => {
                        gateway.dispatcher.dispatch(event);
                        accepted += 1;
                    }
                    None => {
                        info!("Event source closed");
                        break;
                    }
                },
                _ = shutdown.changed() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        accepted
    }

    /// Ask `serve` to stop reading events.
    pub fn request_shutdown(&self) {
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }

    /// Drain in-flight events and report pipeline counters.
    pub async fn shutdown(&self, gateway: Gateway) -> ShutdownReport {
        info!("Initiating graceful shutdown...");

        let timeout = self.config.shutdown.drain_timeout;
        let drained = gateway.dispatcher.drain(timeout).await;
        if !drained {
            warn!(
                pending = gateway.dispatcher.pending(),
                "Drain deadline of {:?} reached with events still in flight", timeout
            );
        }

        let (messages, callbacks) = gateway.dispatcher.pipelines().metrics();
        log_event!(info, "runtime", "Message pipeline", counters = %messages);
        log_event!(info, "runtime", "Callback pipeline", counters = %callbacks);

        info!("Shutdown complete");
        ShutdownReport {
            drained,
            messages,
            callbacks,
        }
    }
}

impl Gateway {
    pub fn store(&self) -> &Arc<FileGatewayStore> {
        &self.store
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn sync_report(&self) -> &SyncReport {
        &self.sync_report
    }

    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }
}
