//! # Core Identifiers
//!
//! Primitive identifiers and well-known role names.

use serde::{Deserialize, Serialize};

/// Platform-assigned user identifier. Unique and stable per user.
pub type UserId = i64;

/// Stable path-derived document identifier (`/`-separated, relative to the
/// document directory).
pub type DocId = String;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Well-known role names.
pub mod roles {
    /// Full administrative access.
    pub const ADMINISTRATOR: &str = "Administrator";
    /// Support operator.
    pub const OPERATOR: &str = "Operator";
}

/// Optional display metadata supplied by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Platform handle, without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,
    /// Human readable name.
    #[serde(default)]
    pub full_name: Option<String>,
}

impl UserProfile {
    /// True when no display metadata is present.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.full_name.is_none()
    }
}
