//! # Middleware Pipeline (cg-04)
//!
//! Every inbound event passes an ordered chain of interceptors before it
//! reaches the handler registry:
//!
//! ```text
//! Event → ActionLogger → ConsentGate → HandlerRegistry
//! ```
//!
//! - `ActionLogger` appends exactly one action-log record per event, carrying
//!   the final allow/block decision. Audit failures are logged and ignored.
//! - `ConsentGate` upserts the user and checks consent. Without consent the
//!   event is blocked and the consent prompt is shown, unless the event is the
//!   consent action itself. Store failures fail closed.
//!
//! Messages and callbacks get independent pipeline instances
//! (`ChannelPipelines`). `EventDispatcher` keeps each user's events in
//! arrival order while different users run concurrently.

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod service;

pub use domain::config::{PipelineConfig, RetryPolicy};
pub use domain::context::EventContext;
pub use domain::errors::{GateError, HandlerError, PromptError};
pub use domain::metrics::{MetricsSnapshot, PipelineMetrics};
pub use domain::summary::summarize;
pub use middleware::{ActionLogger, ConsentGate, Interceptor, Next};
pub use ports::outbound::{ConsentPrompt, HandlerRegistry};
pub use service::{ChannelPipelines, EventDispatcher, Pipeline, PipelineDeps};
