//! # Gateway Runtime
//!
//! Wires the components into a running gateway:
//!
//! ```text
//! config ─▶ cg-01 store ─▶ cg-02 document sync ─▶ cg-03 role reconciler
//!                                                        │
//!        stdin JSON events ─▶ EventDispatcher ─▶ cg-04 pipelines ─▶ handlers
//! ```
//!
//! The binary (`consent-gateway`) uses logging stand-ins for the handler
//! registry and the consent prompt, and reads events from stdin.

pub mod adapters;
pub mod config;
pub mod runtime;


pub use config::{ConfigError, GatewayConfig};
pub use runtime::{Gateway, GatewayRuntime, ShutdownReport};
