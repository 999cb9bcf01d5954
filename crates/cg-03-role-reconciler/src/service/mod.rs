//! # Reconciliation Service


use crate::domain::errors::ReconciliationWarning;
use crate::domain::merge::{merge_ids, ConfiguredRoles};
use cg_01_store::GatewayStoreApi;
use shared_types::{roles, PrivilegedRoster};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a reconciliation run.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub roster: PrivilegedRoster,
    /// Set when the store could not be read and configured ids were used.
    pub warning: Option<ReconciliationWarning>,
}

impl Reconciliation {
    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

/// Produces the effective `PrivilegedRoster`. Read-only on the store.
pub struct RoleReconciler<G: ?Sized> {
    store: Arc<G>,
}

impl<G> RoleReconciler<G>
where
    G: GatewayStoreApi + ?Sized,
{
    pub fn new(store: Arc<G>) -> Self {
        Self { store }
    }

    /// Union of configured and stored ids per role. Never fails.
    pub async fn reconcile(&self, configured: &ConfiguredRoles) -> Reconciliation {
        let admins = self.store.list_user_ids_by_role(roles::ADMINISTRATOR).await;
        let operators = self.store.list_user_ids_by_role(roles::OPERATOR).await;

        match (admins, operators) {
            (Ok(stored_admins), Ok(stored_operators)) => {
                let roster = PrivilegedRoster::new(
                    merge_ids(&configured.admins, &stored_admins),
                    merge_ids(&configured.operators, &stored_operators),
                );
                info!(
                    admins = roster.admins().len(),
                    operators = roster.operators().len(),
                    "[cg-03] Privileged roles reconciled"
                );
                Reconciliation {
                    roster,
                    warning: None,
                }
            }
            (Err(source), _) => Self::degraded(configured, roles::ADMINISTRATOR, source),
            (_, Err(source)) => Self::degraded(configured, roles::OPERATOR, source),
        }
    }

    fn degraded(
        configured: &ConfiguredRoles,
        role: &str,
        source: cg_01_store::StoreError,
    ) -> Reconciliation {
        let warning = ReconciliationWarning {
            role: role.to_string(),
            source,
        };
        warn!("[cg-03] {}", warning);

        Reconciliation {
            roster: PrivilegedRoster::new(
                configured.admins.iter().copied(),
                configured.operators.iter().copied(),
            ),
            warning: Some(warning),
        }
    }
}
