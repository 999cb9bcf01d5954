//! # Pipeline Errors

use cg_01_store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Reported by the handler registry. Logged; never changes the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Handler failed: {message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The consent prompt could not be delivered. Logged; the event stays blocked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Consent prompt failed: {message}")]
pub struct PromptError {
    pub message: String,
}

impl PromptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A Consent Gate store call that exhausted its retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    Store {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("{operation} timed out after {attempts} attempt(s) of {timeout:?}")]
    Timeout {
        operation: &'static str,
        attempts: u32,
        timeout: Duration,
    },
}
