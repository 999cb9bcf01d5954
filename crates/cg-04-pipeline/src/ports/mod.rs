//! # Ports Layer
//!
//! - `outbound.rs` - Collaborators the pipeline hands events to: the handler
//!   registry and the consent prompt

pub mod outbound;
