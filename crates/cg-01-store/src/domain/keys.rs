//! # Key Layout
//!
//! Every entity lives under its own prefix in the backing key-value store.
//! This layout is the only durable file-format contract of the gateway.
//!
//! | Prefix | Key | Value |
//! |--------|-----|-------|
//! | `u:` | user id (i64, big endian) | `User` |
//! | `r:` | role name, `0x00`, user id | empty (membership index) |
//! | `d:` | document id (UTF-8) | `Document` |
//! | `a:` | sequence (u64, big endian) | `ActionLogRecord` |
//! | `m:` | meta name | meta value |

use crate::domain::errors::StoreError;
use shared_types::UserId;

/// Key prefixes of the Store.
pub struct KeyPrefix;

impl KeyPrefix {
    pub const USER: &'static [u8] = b"u:";
    pub const ROLE: &'static [u8] = b"r:";
    pub const DOCUMENT: &'static [u8] = b"d:";
    pub const ACTION_LOG: &'static [u8] = b"a:";
    pub const META: &'static [u8] = b"m:";

    /// Schema version marker, written when the store is created.
    pub const SCHEMA_VERSION_KEY: &'static [u8] = b"m:schema_version";
    /// Last assigned action log sequence.
    pub const LOG_SEQ_KEY: &'static [u8] = b"m:action_log_seq";

    pub fn user_key(user_id: UserId) -> Vec<u8> {
        let mut key = Vec::with_capacity(Self::USER.len() + 8);
        key.extend_from_slice(Self::USER);
        key.extend_from_slice(&user_id.to_be_bytes());
        key
    }

    /// Prefix of all members of `role`.
    pub fn role_prefix(role: &str) -> Result<Vec<u8>, StoreError> {
        if role.is_empty() {
            return Err(StoreError::InvalidKey {
                reason: "role name is empty",
            });
        }
        if role.as_bytes().contains(&0) {
            return Err(StoreError::InvalidKey {
                reason: "role name contains NUL",
            });
        }
        let mut key = Vec::with_capacity(Self::ROLE.len() + role.len() + 1);
        key.extend_from_slice(Self::ROLE);
        key.extend_from_slice(role.as_bytes());
        key.push(0);
        Ok(key)
    }

    pub fn role_member_key(role: &str, user_id: UserId) -> Result<Vec<u8>, StoreError> {
        let mut key = Self::role_prefix(role)?;
        key.extend_from_slice(&user_id.to_be_bytes());
        Ok(key)
    }

    /// Recover the user id from a role membership key.
    pub fn parse_role_member(key: &[u8]) -> Option<UserId> {
        if key.len() < 8 {
            return None;
        }
        let bytes: [u8; 8] = key[key.len() - 8..].try_into().ok()?;
        Some(UserId::from_be_bytes(bytes))
    }

    pub fn document_key(doc_id: &str) -> Result<Vec<u8>, StoreError> {
        if doc_id.is_empty() {
            return Err(StoreError::InvalidKey {
                reason: "document id is empty",
            });
        }
        let mut key = Vec::with_capacity(Self::DOCUMENT.len() + doc_id.len());
        key.extend_from_slice(Self::DOCUMENT);
        key.extend_from_slice(doc_id.as_bytes());
        Ok(key)
    }

    pub fn action_log_key(seq: u64) -> Vec<u8> {
        let mut key = Vec::with_capacity(Self::ACTION_LOG.len() + 8);
        key.extend_from_slice(Self::ACTION_LOG);
        key.extend_from_slice(&seq.to_be_bytes());
        key
    }
}
