//! # Pipeline Service
//!
//! - `Pipeline`: fixed driver over an ordered interceptor list
//! - `ChannelPipelines`: one pipeline per event channel
//! - `EventDispatcher`: per-user FIFO lanes over `ChannelPipelines`

mod dispatcher;
mod handler;

pub use dispatcher::EventDispatcher;
pub(crate) use handler::HandlerStage;

use crate::domain::config::PipelineConfig;
use crate::domain::context::EventContext;
use crate::domain::metrics::{MetricsSnapshot, PipelineMetrics};
use crate::middleware::{ActionLogger, ConsentGate, Interceptor, Next};
use crate::ports::outbound::{ConsentPrompt, HandlerRegistry};
use cg_01_store::{GatewayStoreApi, SystemTimeSource, TimeSource};
use shared_types::{EventKind, InboundEvent, Outcome, PrivilegedRoster};
use std::sync::Arc;

/// Collaborators shared by both channel pipelines.
#[derive(Clone)]
pub struct PipelineDeps {
    pub store: Arc<dyn GatewayStoreApi>,
    pub handlers: Arc<dyn HandlerRegistry>,
    pub prompt: Arc<dyn ConsentPrompt>,
}

/// Ordered interceptors ending in the handler registry.
pub struct Pipeline {
    channel: EventKind,
    interceptors: Vec<Arc<dyn Interceptor>>,
    terminal: HandlerStage,
    metrics: Arc<PipelineMetrics>,
}

impl Pipeline {
    /// Pipeline with an explicit interceptor list.
    pub fn new(
        channel: EventKind,
        interceptors: Vec<Arc<dyn Interceptor>>,
        handlers: Arc<dyn HandlerRegistry>,
        config: &PipelineConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            channel,
            interceptors,
            terminal: HandlerStage::new(handlers, config.handler_timeout, Arc::clone(&metrics)),
            metrics,
        }
    }

    /// `ActionLogger` then `ConsentGate`.
    pub fn standard(channel: EventKind, deps: &PipelineDeps, config: &PipelineConfig) -> Self {
        let metrics = Arc::new(PipelineMetrics::new());
        let interceptors: Vec<Arc<dyn Interceptor>> = vec![
            Arc::new(ActionLogger::new(
                Arc::clone(&deps.store),
                config.summary_max_chars,
                Arc::clone(&metrics),
            )),
            Arc::new(ConsentGate::new(
                Arc::clone(&deps.store),
                Arc::clone(&deps.prompt),
                config,
            )),
        ];
        Self::new(channel, interceptors, Arc::clone(&deps.handlers), config, metrics)
    }

    pub fn channel(&self) -> EventKind {
        self.channel
    }

    /// Stage names in execution order.
    pub fn stages(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn run(&self, ctx: &EventContext) -> Outcome {
        let next = Next {
            chain: &self.interceptors,
            terminal: &self.terminal,
        };
        let outcome = next.run(ctx).await;
        self.metrics.record_outcome(outcome);
        outcome
    }
}

/// The message and callback pipelines plus the roster they share.
pub struct ChannelPipelines {
    message: Pipeline,
    callback: Pipeline,
    roster: Arc<PrivilegedRoster>,
    clock: Arc<dyn TimeSource>,
}

impl ChannelPipelines {
    /// Independent standard pipelines for both channels.
    pub fn new(deps: &PipelineDeps, config: &PipelineConfig, roster: PrivilegedRoster) -> Self {
        Self::from_parts(
            Pipeline::standard(EventKind::Message, deps, config),
            Pipeline::standard(EventKind::Callback, deps, config),
            roster,
        )
    }

    pub fn from_parts(message: Pipeline, callback: Pipeline, roster: PrivilegedRoster) -> Self {
        Self {
            message,
            callback,
            roster: Arc::new(roster),
            clock: Arc::new(SystemTimeSource),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn roster(&self) -> &PrivilegedRoster {
        &self.roster
    }

    pub fn pipeline(&self, channel: EventKind) -> &Pipeline {
        match channel {
            EventKind::Message => &self.message,
            EventKind::Callback => &self.callback,
        }
    }

    /// Stamp an arriving event.
    pub fn context(&self, event: InboundEvent) -> EventContext {
        EventContext::new(event, Arc::clone(&self.roster), self.clock.now())
    }

    /// Run `ctx` through the pipeline of its channel.
    pub async fn process(&self, ctx: &EventContext) -> Outcome {
        self.pipeline(ctx.event.kind()).run(ctx).await
    }

    /// `(message, callback)` counters.
    pub fn metrics(&self) -> (MetricsSnapshot, MetricsSnapshot) {
        (self.message.metrics(), self.callback.metrics())
    }
}
