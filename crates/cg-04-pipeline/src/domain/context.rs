use shared_types::{InboundEvent, PrivilegedRoster, Timestamp};
use std::sync::Arc;
use uuid::Uuid;

/// One pipeline run. Interceptors read it; none of them alter the event.
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Correlation id, also stored in the action log.
    pub event_id: Uuid,
    /// Arrival time (seconds since epoch), captured before queueing.
    pub received_at: Timestamp,
    pub event: InboundEvent,
    /// Effective privileged ids for this process.
    pub roster: Arc<PrivilegedRoster>,
}

impl EventContext {
    pub fn new(event: InboundEvent, roster: Arc<PrivilegedRoster>, received_at: Timestamp) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            received_at,
            event,
            roster,
        }
    }
}
