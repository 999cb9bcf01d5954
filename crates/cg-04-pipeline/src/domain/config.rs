//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Callback payload that grants consent.
pub const DEFAULT_CONSENT_ACTION: &str = "consent:accept";

/// Settings shared by both channel pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Callback data of the consent-granting button.
    pub consent_action: String,
    /// Retry policy for the Consent Gate's store calls.
    pub retry: RetryPolicy,
    /// Bound on a single Consent Gate store call.
    #[serde(with = "humantime_serde")]
    pub store_timeout: Duration,
    /// Bound on handler dispatch. `None` waits indefinitely.
    #[serde(with = "humantime_serde")]
    pub handler_timeout: Option<Duration>,
    /// Characters of free text kept in action-log summaries.
    pub summary_max_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            consent_action: DEFAULT_CONSENT_ACTION.to_string(),
            retry: RetryPolicy::default(),
            store_timeout: Duration::from_secs(2),
            handler_timeout: Some(Duration::from_secs(30)),
            summary_max_chars: 64,
        }
    }
}

/// Bounded retry with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 count as 1.
    pub max_attempts: u32,
    /// Delay after the first failure; the n-th retry waits `n * backoff`.
    #[serde(with = "humantime_serde")]
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no backoff.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}
