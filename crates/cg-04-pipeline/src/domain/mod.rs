//! # Domain Layer
//!
//! - `context` - Per-event state handed to every interceptor
//! - `summary` - Action-log summary of an event
//! - `config` - Pipeline configuration (consent action, retry, timeouts)
//! - `metrics` - Atomic per-pipeline counters
//! - `errors` - Collaborator and gate errors

pub mod config;
pub mod context;
pub mod errors;
pub mod metrics;
pub mod summary;
