//! Consent stage.
//!
//! Upserts the user, then checks consent. Users without consent are blocked
//! and shown the consent prompt, except for the consent action itself, which
//! grants consent and passes. Every store call is bounded by a timeout and
//! retried; a call that still fails blocks the event (fail closed). The prompt
//! runs in its own task so a faulty transport cannot take the gate down.

use super::{Interceptor, Next};
use crate::domain::config::{PipelineConfig, RetryPolicy};
use crate::domain::context::EventContext;
use crate::domain::errors::GateError;
use crate::ports::outbound::ConsentPrompt;
use async_trait::async_trait;
use cg_01_store::{GatewayStoreApi, StoreError};
use shared_types::{BlockReason, InboundEvent, Outcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct ConsentGate {
    store: Arc<dyn GatewayStoreApi>,
    prompt: Arc<dyn ConsentPrompt>,
    consent_action: String,
    retry: RetryPolicy,
    store_timeout: Duration,
}

impl ConsentGate {
    pub fn new(
        store: Arc<dyn GatewayStoreApi>,
        prompt: Arc<dyn ConsentPrompt>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            store,
            prompt,
            consent_action: config.consent_action.clone(),
            retry: config.retry,
            store_timeout: config.store_timeout,
        }
    }

    /// A callback whose payload is the configured consent action.
    pub fn is_consent_action(&self, event: &InboundEvent) -> bool {
        matches!(event, InboundEvent::Callback(cb) if cb.data.as_deref() == Some(self.consent_action.as_str()))
    }

    async fn check_consent(&self, event: &InboundEvent) -> Result<bool, GateError> {
        let user_id = event.user_id();
        let profile = event.profile().clone();

        let store = Arc::clone(&self.store);
        self.call_store("ensure_user", move || {
            let store = Arc::clone(&store);
            let profile = profile.clone();
            async move { store.ensure_user(user_id, &profile).await.map(|_| ()) }
        })
        .await?;

        let store = Arc::clone(&self.store);
        self.call_store("has_consent", move || {
            let store = Arc::clone(&store);
            async move { store.has_consent(user_id).await }
        })
        .await
    }

    async fn grant(&self, event: &InboundEvent) -> Result<(), GateError> {
        let user_id = event.user_id();
        let store = Arc::clone(&self.store);
        self.call_store("grant_consent", move || {
            let store = Arc::clone(&store);
            async move { store.grant_consent(user_id).await }
        })
        .await
    }

    /// Bounded retry: each attempt gets `store_timeout`.
    async fn call_store<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, GateError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            let error = match tokio::time::timeout(self.store_timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(source)) => GateError::Store {
                    operation,
                    attempts: attempt,
                    source,
                },
                Err(_) => GateError::Timeout {
                    operation,
                    attempts: attempt,
                    timeout: self.store_timeout,
                },
            };

            if attempt >= attempts {
                return Err(error);
            }
            debug!(attempt, error = %error, "[cg-04] Consent gate retrying store call");
            tokio::time::sleep(self.retry.backoff_for(attempt)).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl Interceptor for ConsentGate {
    fn name(&self) -> &'static str {
        "consent_gate"
    }

    async fn handle(&self, ctx: &EventContext, next: Next<'_>) -> Outcome {
        let user_id = ctx.event.user_id();

        let consented = match self.check_consent(&ctx.event).await {
            Ok(consented) => consented,
            Err(e) => {
                warn!(user_id, error = %e, "[cg-04] Consent check failed, blocking event");
                return Outcome::Blocked(BlockReason::GateFailure);
            }
        };

        if consented {
            return next.run(ctx).await;
        }

        if self.is_consent_action(&ctx.event) {
            return match self.grant(&ctx.event).await {
                Ok(()) => {
                    info!(user_id, "[cg-04] Consent action accepted");
                    next.run(ctx).await
                }
                Err(e) => {
                    warn!(user_id, error = %e, "[cg-04] Granting consent failed, blocking event");
                    Outcome::Blocked(BlockReason::GateFailure)
                }
            };
        }

        debug!(user_id, kind = %ctx.event.kind(), "[cg-04] No consent, prompting");
        self.send_prompt(ctx).await;
        Outcome::Blocked(BlockReason::ConsentMissing)
    }
}

impl ConsentGate {
    async fn send_prompt(&self, ctx: &EventContext) {
        let user_id = ctx.event.user_id();
        let prompt = Arc::clone(&self.prompt);
        let event = ctx.event.clone();

        match tokio::spawn(async move { prompt.prompt(&event).await }).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(user_id, error = %e, "[cg-04] Consent prompt not delivered"),
            Err(e) => error!(user_id, error = %e, "[cg-04] Consent prompt task aborted"),
        }
    }
}
