//! # Core Domain Entities
//!
//! Records owned by the Store. Callers receive copies; the Store is the only
//! writer.

use serde::{Deserialize, Serialize};
use shared_types::{DocId, EventKind, Outcome, Timestamp, UserId, UserProfile};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A user observed by the gateway.
///
/// Created on the first observed event and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub profile: UserProfile,
    /// Consent flag. Only ever transitions `false -> true`.
    pub consent: bool,
    /// When consent was granted.
    pub consent_granted_at: Option<Timestamp>,
    /// Assigned role names.
    pub roles: BTreeSet<String>,
    /// First time the user was observed.
    pub first_seen: Timestamp,
}

impl User {
    pub fn new(id: UserId, profile: UserProfile, now: Timestamp) -> Self {
        Self {
            id,
            profile,
            consent: false,
            consent_granted_at: None,
            roles: BTreeSet::new(),
            first_seen: now,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Merge freshly observed display metadata. Returns true if anything
    /// changed. Absent fields never erase known ones.
    pub fn refresh_profile(&mut self, observed: &UserProfile) -> bool {
        let mut changed = false;
        if observed.username.is_some() && observed.username != self.profile.username {
            self.profile.username = observed.username.clone();
            changed = true;
        }
        if observed.full_name.is_some() && observed.full_name != self.profile.full_name {
            self.profile.full_name = observed.full_name.clone();
            changed = true;
        }
        changed
    }
}

/// Content fingerprint of a tracked file.
///
/// Stable across runs while the content is unchanged, independent of mtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// File size in bytes.
    pub size: u64,
    /// SHA-256 of the file content.
    pub sha256: [u8; 32],
}

impl Fingerprint {
    pub fn new(size: u64, sha256: [u8; 32]) -> Self {
        Self { size, sha256 }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.size, hex::encode(&self.sha256[..8]))
    }
}

/// One file tracked from the document directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub fingerprint: Fingerprint,
    /// When this entry was last written by a sync.
    pub synced_at: Timestamp,
}

/// Audit entry as submitted by the Action Logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActionLogRecord {
    /// Correlation id of the pipeline run.
    pub event_id: Uuid,
    /// Arrival time of the event.
    pub timestamp: Timestamp,
    pub user_id: UserId,
    pub kind: EventKind,
    /// Command name, callback payload, or text snippet.
    pub summary: String,
    pub outcome: Outcome,
}

/// Persisted, immutable audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogRecord {
    /// Append order, starting at 1.
    pub seq: u64,
    pub event_id: Uuid,
    pub timestamp: Timestamp,
    pub user_id: UserId,
    pub kind: EventKind,
    pub summary: String,
    pub outcome: Outcome,
}

impl ActionLogRecord {
    pub fn from_new(seq: u64, record: NewActionLogRecord) -> Self {
        Self {
            seq,
            event_id: record.event_id,
            timestamp: record.timestamp,
            user_id: record.user_id,
            kind: record.kind,
            summary: record.summary,
            outcome: record.outcome,
        }
    }
}
