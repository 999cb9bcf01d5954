//! # Domain Errors
//!
//! Error types for the Store.
//!
//! `StoreError` is surfaced to every caller. Callers with an explicit degrade
//! policy (role reconciliation, best-effort audit) decide whether to swallow
//! it; nobody else does.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backing key-value store I/O failure.
    #[error("Database error: {message}")]
    DatabaseError { message: String },

    /// A persisted record could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// The store on disk was written by an incompatible schema.
    #[error("Schema version mismatch: found {found}, expected {expected}")]
    SchemaMismatch { found: u32, expected: u32 },

    /// Another process holds the store.
    #[error("Database locked: {message}")]
    DatabaseLocked { message: String },

    /// A key component would corrupt the key layout.
    #[error("Invalid key: {reason}")]
    InvalidKey { reason: &'static str },
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

impl From<KVStoreError> for StoreError {
    fn from(err: KVStoreError) -> Self {
        StoreError::DatabaseError {
            message: err.to_string(),
        }
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::SerializationError {
            message: err.to_string(),
        }
    }
}
