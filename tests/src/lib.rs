//! # Consent Gateway Test Suite
//!
//! Cross-crate scenarios that exercise the components together, against
//! both the in-memory and the journal-file store.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs        # Shared store and directory helpers
//!     ├── document_sync.rs   # cg-02 against a real directory and store
//!     ├── roles.rs           # cg-03 set-union properties
//!     └── pipeline.rs        # cg-04 consent flow and audit completeness
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cg-tests
//! cargo test -p cg-tests integration::pipeline::
//! ```

pub mod integration;
