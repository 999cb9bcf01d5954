//! # Set Union
//!
//! `effective = sort(unique(configured ∪ stored))`

use shared_types::UserId;
use std::collections::BTreeSet;

/// Privileged ids from deployment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfiguredRoles {
    pub admins: Vec<UserId>,
    pub operators: Vec<UserId>,
}

/// Sorted, duplicate-free union of both id sets.
pub fn merge_ids(configured: &[UserId], stored: &BTreeSet<UserId>) -> Vec<UserId> {
    let mut merged: BTreeSet<UserId> = stored.clone();
    merged.extend(configured.iter().copied());
    merged.into_iter().collect()
}
