//! Interceptors of the event pipeline.
//!
//! Stage order: Event → ActionLogger → ConsentGate → HandlerRegistry
//!
//! Each interceptor gets the event and a `Next` handle to the rest of the
//! chain. Returning without calling `next.run` short-circuits every later
//! stage, including the handler registry.

pub mod action_logger;
pub mod consent_gate;

pub use action_logger::ActionLogger;
pub use consent_gate::ConsentGate;

use crate::domain::context::EventContext;
use crate::service::HandlerStage;
use async_trait::async_trait;
use shared_types::Outcome;
use std::sync::Arc;

/// One stage of the pipeline.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Stage name for logs.
    fn name(&self) -> &'static str;

    async fn handle(&self, ctx: &EventContext, next: Next<'_>) -> Outcome;
}

/// The remainder of the chain after the current interceptor.
pub struct Next<'a> {
    pub(crate) chain: &'a [Arc<dyn Interceptor>],
    pub(crate) terminal: &'a HandlerStage,
}

impl<'a> Next<'a> {
    /// Run the remaining interceptors, then the handler registry.
    pub async fn run(self, ctx: &EventContext) -> Outcome {
        match self.chain.split_first() {
            Some((head, tail)) => {
                let next = Next {
                    chain: tail,
                    terminal: self.terminal,
                };
                head.handle(ctx, next).await
            }
            None => self.terminal.dispatch(ctx).await,
        }
    }
}
