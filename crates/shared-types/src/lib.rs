//! # Shared Types Crate
//!
//! Cross-crate types for the consent gateway.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers, events and outcomes are defined
//!   here and nowhere else.
//! - **Closed Event Variant**: the transport hands the gateway an
//!   [`InboundEvent`], either a plain message or a callback. Every pipeline
//!   stage is written once against the variant.
//! - **Immutable Roster**: the effective admin/operator lists are produced once
//!   at startup and shared as a read-only [`PrivilegedRoster`] snapshot.

pub mod entities;
pub mod events;
pub mod outcome;
pub mod roster;

pub use entities::*;
pub use events::{CallbackEvent, EventKind, InboundEvent, MessageEvent};
pub use outcome::{BlockReason, Outcome};
pub use roster::PrivilegedRoster;
