//! # Role Reconciliation Integration
//!
//! `RoleReconciler` against a real store: effective lists are the sorted
//! union of configured and stored ids, and the store is never written.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::counting_store;
    use cg_01_store::{GatewayStore, GatewayStoreApi};
    use cg_03_role_reconciler::{ConfiguredRoles, RoleReconciler};
    use proptest::prelude::*;
    use shared_types::{roles, UserId};
    use std::collections::BTreeSet;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_configured_and_stored_admins_merge() {
        let (store, writes) = counting_store();
        store.assign_role(2, roles::ADMINISTRATOR).await.unwrap();
        store.assign_role(3, roles::ADMINISTRATOR).await.unwrap();
        let before = writes.load(Ordering::SeqCst);

        let configured = ConfiguredRoles {
            admins: vec![1, 2],
            operators: vec![],
        };
        let reconciler = RoleReconciler::new(Arc::clone(&store));

        let first = reconciler.reconcile(&configured).await;
        let second = reconciler.reconcile(&configured).await;

        assert_eq!(first.roster.admins(), &[1, 2, 3]);
        assert_eq!(first.roster.admins_display(), "1, 2, 3");
        assert_eq!(first.roster.operators_display(), "—");
        assert_eq!(first.roster, second.roster);

        assert_eq!(writes.load(Ordering::SeqCst), before);
        let stored = store.list_user_ids_by_role(roles::ADMINISTRATOR).await.unwrap();
        assert_eq!(stored, BTreeSet::from([2, 3]));
    }

    #[tokio::test]
    async fn test_stored_roles_grant_privileges_to_unconfigured_users() {
        let store = Arc::new(GatewayStore::in_memory());
        store.assign_role(77, roles::OPERATOR).await.unwrap();

        let reconciliation = RoleReconciler::new(Arc::clone(&store))
            .reconcile(&ConfiguredRoles::default())
            .await;

        assert!(reconciliation.roster.is_operator(77));
        assert!(reconciliation.roster.is_privileged(77));
        assert!(!reconciliation.roster.is_admin(77));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_effective_is_sorted_union(
            configured in proptest::collection::vec(-50i64..50, 0..10),
            stored in proptest::collection::btree_set(-50i64..50, 0..10),
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let store = Arc::new(GatewayStore::in_memory());
            for id in &stored {
                runtime.block_on(store.assign_role(*id, roles::ADMINISTRATOR)).unwrap();
            }

            let reconciliation = runtime.block_on(
                RoleReconciler::new(Arc::clone(&store)).reconcile(&ConfiguredRoles {
                    admins: configured.clone(),
                    operators: vec![],
                }),
            );

            let expected: Vec<UserId> = configured
                .iter()
                .copied()
                .chain(stored.iter().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            prop_assert_eq!(reconciliation.roster.admins(), expected.as_slice());
            prop_assert!(reconciliation.roster.operators().is_empty());
        }
    }
}
