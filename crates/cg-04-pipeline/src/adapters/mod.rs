//! # Adapters
//!
//! In-process collaborators that record what the pipeline hands them.
//! Used by tests and local dry runs.

mod recording;

pub use recording::{RecordingHandlers, RecordingPrompt};
