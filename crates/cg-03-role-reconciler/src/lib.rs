//! # Role Reconciler (cg-03)
//!
//! Merges the admin/operator ids known at deploy time with the members of
//! the `Administrator` and `Operator` roles in the store. The result is an
//! immutable `PrivilegedRoster` used for the rest of the process lifetime.
//!
//! Reconciliation never writes to the store. If either role query fails,
//! both lists fall back to the configured ids and a `ReconciliationWarning`
//! is reported; startup continues.

pub mod domain;
pub mod service;

pub use domain::errors::ReconciliationWarning;
pub use domain::merge::{merge_ids, ConfiguredRoles};
pub use service::{Reconciliation, RoleReconciler};
