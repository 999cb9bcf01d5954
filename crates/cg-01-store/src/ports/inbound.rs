//! # Inbound Port (Driving Port)
//!
//! The Store contract. Every operation is safe under concurrent invocation
//! from multiple event-handling tasks.

use async_trait::async_trait;
use shared_types::{DocId, UserId, UserProfile};
use std::collections::BTreeSet;

use crate::domain::entities::{ActionLogRecord, Document, Fingerprint, NewActionLogRecord, User};
use crate::domain::errors::StoreError;

/// Persistent gateway state: users, roles, consent, documents, action log.
#[async_trait]
pub trait GatewayStoreApi: Send + Sync {
    /// Idempotent upsert. Returns the existing or newly created user.
    ///
    /// Non-empty display metadata in `profile` refreshes the stored one.
    async fn ensure_user(&self, user_id: UserId, profile: &UserProfile)
        -> Result<User, StoreError>;

    /// Look a user up without creating it.
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, StoreError>;

    /// Members of `role`. Empty (not an error) for unknown or empty roles.
    async fn list_user_ids_by_role(&self, role: &str) -> Result<BTreeSet<UserId>, StoreError>;

    /// Add `role` to the user, creating the user if needed. Idempotent.
    async fn assign_role(&self, user_id: UserId, role: &str) -> Result<(), StoreError>;

    /// Consent flag. `false` for users never seen.
    async fn has_consent(&self, user_id: UserId) -> Result<bool, StoreError>;

    /// Transition consent to granted. A no-op if already granted.
    async fn grant_consent(&self, user_id: UserId) -> Result<(), StoreError>;

    /// Insert or replace a document entry.
    async fn upsert_document(&self, doc_id: &str, fingerprint: Fingerprint)
        -> Result<(), StoreError>;

    /// Remove a document entry. Removing a missing entry is a no-op.
    async fn delete_document(&self, doc_id: &str) -> Result<(), StoreError>;

    async fn list_document_ids(&self) -> Result<BTreeSet<DocId>, StoreError>;

    /// All document entries, ordered by id.
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError>;

    /// Append one audit record. Returns its sequence number.
    ///
    /// Fails only on unrecoverable I/O; concurrent appends are serialized.
    async fn append_action_log(&self, record: NewActionLogRecord) -> Result<u64, StoreError>;

    /// Number of audit records.
    async fn action_log_len(&self) -> Result<u64, StoreError>;

    /// Most recent audit records first, at most `limit`.
    async fn list_action_log(&self, limit: usize) -> Result<Vec<ActionLogRecord>, StoreError>;

    /// Most recent audit records of one user first, at most `limit`.
    async fn list_action_log_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ActionLogRecord>, StoreError>;
}
