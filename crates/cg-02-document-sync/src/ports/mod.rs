//! # Ports Layer
//!
//! - `inbound.rs` - `DocumentSyncApi`
//! - `outbound.rs` - `DocumentSource` (directory enumeration)

pub mod inbound;
pub mod outbound;
