//! Terminal stage: hands allowed events to the handler registry.

use crate::domain::context::EventContext;
use crate::domain::metrics::PipelineMetrics;
use crate::ports::outbound::HandlerRegistry;
use shared_types::Outcome;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub(crate) struct HandlerStage {
    registry: Arc<dyn HandlerRegistry>,
    timeout: Option<Duration>,
    metrics: Arc<PipelineMetrics>,
}

impl HandlerStage {
    pub(crate) fn new(
        registry: Arc<dyn HandlerRegistry>,
        timeout: Option<Duration>,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            registry,
            timeout,
            metrics,
        }
    }

    /// Handler results are logged, never inspected. The handler runs in its
    /// own task so a panic stays scoped to this event; a handler that outlives
    /// the timeout is aborted.
    pub(crate) async fn dispatch(&self, ctx: &EventContext) -> Outcome {
        let registry = Arc::clone(&self.registry);
        let event = ctx.event.clone();
        let roster = Arc::clone(&ctx.roster);
        let mut task = tokio::spawn(async move { registry.dispatch(&event, &roster).await });

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    task.abort();
                    self.metrics.record_handler_timeout();
                    warn!(
                        event_id = %ctx.event_id,
                        timeout_ms = limit.as_millis() as u64,
                        "[cg-04] Handler timed out, aborted"
                    );
                    return Outcome::Allowed;
                }
            },
            None => task.await,
        };

        match joined {
            Ok(Ok(())) => debug!(event_id = %ctx.event_id, "[cg-04] Handler completed"),
            Ok(Err(e)) => {
                self.metrics.record_handler_failure();
                warn!(event_id = %ctx.event_id, error = %e, "[cg-04] Handler failed");
            }
            Err(e) => {
                self.metrics.record_handler_failure();
                error!(event_id = %ctx.event_id, error = %e, "[cg-04] Handler task aborted");
            }
        }

        Outcome::Allowed
    }
}
