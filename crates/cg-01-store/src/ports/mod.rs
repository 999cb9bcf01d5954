//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (the Store contract used by every caller)
//! - `outbound.rs` - Driven ports (key-value backend, time source)

pub mod inbound;
pub mod outbound;
