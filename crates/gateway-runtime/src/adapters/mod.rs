//! Stand-ins for the collaborators the gateway does not own: the messaging
//! transport, the handler registry and the consent prompt.

mod source;
mod standins;

pub use source::{EventSource, JsonLinesSource};
pub use standins::{LoggingHandlers, LoggingPrompt};
