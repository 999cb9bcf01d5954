//! # Privileged Roster
//!
//! Effective admin/operator identifier lists, produced once by the role
//! reconciler and handed read-only to every pipeline stage and handler.

use serde::{Deserialize, Serialize};

use crate::entities::UserId;

/// Placeholder rendered for an empty identifier list.
pub const EMPTY_LIST: &str = "—";

/// Immutable snapshot of privileged identifiers.
///
/// Both lists are sorted ascending and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegedRoster {
    admins: Vec<UserId>,
    operators: Vec<UserId>,
}

impl PrivilegedRoster {
    /// Build a roster, normalizing both lists (sort + dedup).
    pub fn new(
        admins: impl IntoIterator<Item = UserId>,
        operators: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self {
            admins: normalize(admins),
            operators: normalize(operators),
        }
    }

    pub fn admins(&self) -> &[UserId] {
        &self.admins
    }

    pub fn operators(&self) -> &[UserId] {
        &self.operators
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admins.binary_search(&user_id).is_ok()
    }

    pub fn is_operator(&self, user_id: UserId) -> bool {
        self.operators.binary_search(&user_id).is_ok()
    }

    /// Admin or operator.
    pub fn is_privileged(&self, user_id: UserId) -> bool {
        self.is_admin(user_id) || self.is_operator(user_id)
    }

    /// Comma separated admin ids, or `—` when empty.
    pub fn admins_display(&self) -> String {
        display_ids(&self.admins)
    }

    /// Comma separated operator ids, or `—` when empty.
    pub fn operators_display(&self) -> String {
        display_ids(&self.operators)
    }
}

fn normalize(ids: impl IntoIterator<Item = UserId>) -> Vec<UserId> {
    let mut ids: Vec<UserId> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn display_ids(ids: &[UserId]) -> String {
    if ids.is_empty() {
        return EMPTY_LIST.to_string();
    }
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
