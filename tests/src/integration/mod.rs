//! Integration scenarios.

pub mod document_sync;
#[cfg(test)]
pub mod fixtures;
pub mod pipeline;
pub mod roles;
