use async_trait::async_trait;
use cg_04_pipeline::{ConsentPrompt, HandlerError, HandlerRegistry, PromptError};
use shared_types::{InboundEvent, PrivilegedRoster};
use tracing::info;

/// Handler registry that only logs what it would have handled.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandlers;

#[async_trait]
impl HandlerRegistry for LoggingHandlers {
    async fn dispatch(
        &self,
        event: &InboundEvent,
        roster: &PrivilegedRoster,
    ) -> Result<(), HandlerError> {
        let user_id = event.user_id();
        info!(
            user_id,
            kind = %event.kind(),
            payload = event.payload().unwrap_or(""),
            admin = roster.is_admin(user_id),
            operator = roster.is_operator(user_id),
            "[gw] Handler invoked"
        );
        Ok(())
    }
}

/// Consent prompt that logs instead of rendering a message.
#[derive(Debug, Clone)]
pub struct LoggingPrompt {
    consent_action: String,
}

impl LoggingPrompt {
    pub fn new(consent_action: impl Into<String>) -> Self {
        Self {
            consent_action: consent_action.into(),
        }
    }
}

#[async_trait]
impl ConsentPrompt for LoggingPrompt {
    async fn prompt(&self, event: &InboundEvent) -> Result<(), PromptError> {
        info!(
            user_id = event.user_id(),
            button = %self.consent_action,
            "[gw] Consent required, prompt shown"
        );
        Ok(())
    }
}
