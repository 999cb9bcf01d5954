//! # Domain Layer
//!
//! - `plan` - Pure diff between a directory snapshot and the stored catalog
//! - `report` - Outcome of a sync run
//! - `config` - Scan options
//! - `errors` - `SyncError` (fatal) and `SyncWarning` (per file)

pub mod config;
pub mod errors;
pub mod plan;
pub mod report;
