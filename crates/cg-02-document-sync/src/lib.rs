//! # Document Synchronizer (cg-02)
//!
//! Runs once at startup: makes the store's document catalog mirror the files
//! of the document directory.
//!
//! 1. The `DocumentSource` enumerates files and fingerprints them.
//! 2. `SyncPlan::compute` diffs the snapshot against the stored catalog.
//! 3. The service upserts added/changed entries and deletes stale ones.
//!
//! Running it twice with no disk changes performs zero writes. An unreadable
//! file is skipped with a `SyncWarning`; an unreadable directory is a fatal
//! `SyncError`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::DirectoryScanner;
pub use domain::config::ScanOptions;
pub use domain::errors::{SyncError, SyncWarning};
pub use domain::plan::SyncPlan;
pub use domain::report::SyncReport;
pub use ports::inbound::DocumentSyncApi;
pub use ports::outbound::{DocumentSnapshot, DocumentSource};
pub use service::DocumentSyncService;
