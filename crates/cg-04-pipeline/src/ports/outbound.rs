use crate::domain::errors::{HandlerError, PromptError};
use async_trait::async_trait;
use shared_types::{InboundEvent, PrivilegedRoster};

/// Business-logic handlers. Receives allowed events unchanged.
#[async_trait]
pub trait HandlerRegistry: Send + Sync {
    async fn dispatch(
        &self,
        event: &InboundEvent,
        roster: &PrivilegedRoster,
    ) -> Result<(), HandlerError>;
}

/// Shows the fixed "please consent" prompt to a blocked user.
#[async_trait]
pub trait ConsentPrompt: Send + Sync {
    async fn prompt(&self, event: &InboundEvent) -> Result<(), PromptError>;
}
