//! # Pipeline Outcome
//!
//! The final allow/block decision for one event. Recorded verbatim in the
//! action log.

use serde::{Deserialize, Serialize};

/// Why an event was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// The user has not granted consent.
    ConsentMissing,
    /// The consent check itself failed; the gate fails closed.
    GateFailure,
}

/// Allow/block decision for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Allowed,
    Blocked(BlockReason),
}

impl Outcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Outcome::Allowed)
    }

    pub fn is_blocked(&self) -> bool {
        !self.is_allowed()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Allowed => "allowed",
            Outcome::Blocked(_) => "blocked",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Allowed => f.write_str("allowed"),
            Outcome::Blocked(BlockReason::ConsentMissing) => f.write_str("blocked (consent missing)"),
            Outcome::Blocked(BlockReason::GateFailure) => f.write_str("blocked (gate failure)"),
        }
    }
}
