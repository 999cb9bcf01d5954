//! Per-user ordering.
//!
//! Each user with pending events owns a lane: a FIFO queue drained by one
//! worker task. A lane exists in the map exactly while its worker runs, and
//! both enqueueing and lane removal happen under the map lock, so an event is
//! never stranded in a queue nobody drains. Each event is processed in its
//! own task; a panic there costs that event only, never the lane.

use super::ChannelPipelines;
use crate::domain::context::EventContext;
use parking_lot::Mutex;
use shared_types::{InboundEvent, UserId};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, error};

type Lanes = Mutex<HashMap<UserId, Lane>>;

/// Queued events of one user plus the one being processed, if any.
#[derive(Default)]
struct Lane {
    queue: VecDeque<EventContext>,
    in_flight: bool,
}

impl Lane {
    fn pending(&self) -> usize {
        self.queue.len() + usize::from(self.in_flight)
    }
}

/// Runs events through `ChannelPipelines`, in order per user and
/// concurrently across users.
#[derive(Clone)]
pub struct EventDispatcher {
    pipelines: Arc<ChannelPipelines>,
    lanes: Arc<Lanes>,
    idle: Arc<Notify>,
}

impl EventDispatcher {
    pub fn new(pipelines: Arc<ChannelPipelines>) -> Self {
        Self {
            pipelines,
            lanes: Arc::new(Mutex::new(HashMap::new())),
            idle: Arc::new(Notify::new()),
        }
    }

    pub fn pipelines(&self) -> &Arc<ChannelPipelines> {
        &self.pipelines
    }

    /// Queue `event` behind the user's earlier events. Must be called from
    /// within a tokio runtime.
    pub fn dispatch(&self, event: InboundEvent) {
        let user_id = event.user_id();
        let ctx = self.pipelines.context(event);

        let spawn_worker = {
            let mut lanes = self.lanes.lock();
            match lanes.get_mut(&user_id) {
                Some(lane) => {
                    lane.queue.push_back(ctx);
                    false
                }
                None => {
                    let mut lane = Lane::default();
                    lane.queue.push_back(ctx);
                    lanes.insert(user_id, lane);
                    true
                }
            }
        };

        if spawn_worker {
            let worker = self.clone();
            tokio::spawn(async move { worker.drain_lane(user_id).await });
        }
    }

    async fn drain_lane(self, user_id: UserId) {
        loop {
            let next = {
                let mut lanes = self.lanes.lock();
                let popped = lanes.get_mut(&user_id).and_then(|lane| {
                    let popped = lane.queue.pop_front();
                    lane.in_flight = popped.is_some();
                    popped
                });
                if popped.is_none() {
                    lanes.remove(&user_id);
                    if lanes.is_empty() {
                        self.idle.notify_waiters();
                    }
                }
                popped
            };

            let Some(ctx) = next else {
                return;
            };

            let event_id = ctx.event_id;
            let kind = ctx.event.kind();
            let pipelines = Arc::clone(&self.pipelines);
            match tokio::spawn(async move { pipelines.process(&ctx).await }).await {
                Ok(outcome) => debug!(
                    event_id = %event_id,
                    user_id,
                    kind = %kind,
                    outcome = outcome.as_str(),
                    "[cg-04] Event processed"
                ),
                Err(e) => error!(
                    event_id = %event_id,
                    user_id,
                    kind = %kind,
                    error = %e,
                    "[cg-04] Event processing aborted"
                ),
            }
        }
    }

    /// Events queued or running.
    pub fn pending(&self) -> usize {
        self.lanes.lock().values().map(Lane::pending).sum()
    }

    /// Users with a running lane.
    pub fn active_users(&self) -> usize {
        self.lanes.lock().len()
    }

    /// Wait until every lane has finished, at most `timeout`.
    /// Returns false if work remained at the deadline.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.lanes.lock().is_empty() {
                return true;
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.lanes.lock().is_empty();
            }
        }
    }
}
