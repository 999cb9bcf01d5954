//! Audit stage. Runs first and records every event exactly once.
//!
//! The record is captured on arrival and appended after the rest of the
//! chain has decided, so the stored outcome is the final one.

use super::{Interceptor, Next};
use crate::domain::context::EventContext;
use crate::domain::metrics::PipelineMetrics;
use crate::domain::summary::summarize;
use async_trait::async_trait;
use cg_01_store::{GatewayStoreApi, NewActionLogRecord};
use shared_types::Outcome;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ActionLogger {
    store: Arc<dyn GatewayStoreApi>,
    summary_max_chars: usize,
    metrics: Arc<PipelineMetrics>,
}

impl ActionLogger {
    pub fn new(
        store: Arc<dyn GatewayStoreApi>,
        summary_max_chars: usize,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            store,
            summary_max_chars,
            metrics,
        }
    }
}

#[async_trait]
impl Interceptor for ActionLogger {
    fn name(&self) -> &'static str {
        "action_logger"
    }

    async fn handle(&self, ctx: &EventContext, next: Next<'_>) -> Outcome {
        let mut record = NewActionLogRecord {
            event_id: ctx.event_id,
            timestamp: ctx.received_at,
            user_id: ctx.event.user_id(),
            kind: ctx.event.kind(),
            summary: summarize(&ctx.event, self.summary_max_chars),
            outcome: Outcome::Allowed,
        };

        let outcome = next.run(ctx).await;
        record.outcome = outcome;

        match self.store.append_action_log(record).await {
            Ok(seq) => debug!(
                event_id = %ctx.event_id,
                seq,
                outcome = outcome.as_str(),
                "[cg-04] Action logged"
            ),
            Err(e) => {
                self.metrics.record_audit_failure();
                warn!(
                    event_id = %ctx.event_id,
                    user_id = ctx.event.user_id(),
                    error = %e,
                    "[cg-04] Action log append failed, continuing"
                );
            }
        }

        outcome
    }
}
