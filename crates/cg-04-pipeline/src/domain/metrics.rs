//! Per-pipeline counters, logged at shutdown.

use shared_types::{BlockReason, Outcome};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    pub events: AtomicU64,
    pub allowed: AtomicU64,
    pub blocked_no_consent: AtomicU64,
    pub blocked_gate_failure: AtomicU64,
    /// Action-log appends that failed.
    pub audit_failures: AtomicU64,
    pub handler_failures: AtomicU64,
    pub handler_timeouts: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&self, outcome: Outcome) {
        self.events.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            Outcome::Allowed => &self.allowed,
            Outcome::Blocked(BlockReason::ConsentMissing) => &self.blocked_no_consent,
            Outcome::Blocked(BlockReason::GateFailure) => &self.blocked_gate_failure,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_audit_failure(&self) {
        self.audit_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handler_failure(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handler_timeout(&self) {
        self.handler_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events: self.events.load(Ordering::Relaxed),
            allowed: self.allowed.load(Ordering::Relaxed),
            blocked_no_consent: self.blocked_no_consent.load(Ordering::Relaxed),
            blocked_gate_failure: self.blocked_gate_failure.load(Ordering::Relaxed),
            audit_failures: self.audit_failures.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            handler_timeouts: self.handler_timeouts.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of `PipelineMetrics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events: u64,
    pub allowed: u64,
    pub blocked_no_consent: u64,
    pub blocked_gate_failure: u64,
    pub audit_failures: u64,
    pub handler_failures: u64,
    pub handler_timeouts: u64,
}

impl MetricsSnapshot {
    pub fn blocked(&self) -> u64 {
        self.blocked_no_consent + self.blocked_gate_failure
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "events={} allowed={} blocked={} (no_consent={}, gate_failure={}) audit_failures={} handler_failures={} handler_timeouts={}",
            self.events,
            self.allowed,
            self.blocked(),
            self.blocked_no_consent,
            self.blocked_gate_failure,
            self.audit_failures,
            self.handler_failures,
            self.handler_timeouts
        )
    }
}
