use crate::domain::errors::{HandlerError, PromptError};
use crate::ports::outbound::{ConsentPrompt, HandlerRegistry};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{InboundEvent, PrivilegedRoster, UserId};

/// Handler registry that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingHandlers {
    events: Mutex<Vec<InboundEvent>>,
}

impl RecordingHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<InboundEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// Payloads received from `user_id`, in arrival order.
    pub fn payloads_of(&self, user_id: UserId) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.user_id() == user_id)
            .map(|e| e.payload().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl HandlerRegistry for RecordingHandlers {
    async fn dispatch(
        &self,
        event: &InboundEvent,
        _roster: &PrivilegedRoster,
    ) -> Result<(), HandlerError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Consent prompt that records who was prompted.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    prompted: Mutex<Vec<UserId>>,
}

impl RecordingPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompted(&self) -> Vec<UserId> {
        self.prompted.lock().clone()
    }
}

#[async_trait]
impl ConsentPrompt for RecordingPrompt {
    async fn prompt(&self, event: &InboundEvent) -> Result<(), PromptError> {
        self.prompted.lock().push(event.user_id());
        Ok(())
    }
}
