//! # Adapters
//!
//! - `directory`: filesystem `DocumentSource` with SHA-256 fingerprints

mod directory;

pub use directory::DirectoryScanner;
