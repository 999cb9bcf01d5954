//! # Domain Layer
//!
//! Pure domain logic for the Store. No I/O lives here.
//!
//! ## Modules
//!
//! - `entities` - Persisted records (User, Document, ActionLogRecord)
//! - `keys` - Key layout of the backing key-value store
//! - `config` - Store configuration
//! - `errors` - Domain error types

pub mod config;
pub mod entities;
pub mod errors;
pub mod keys;
