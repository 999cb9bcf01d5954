//! # Sync Plan
//!
//! Pure diff of `on_disk` against `in_store`, both keyed by document id.

use cg_01_store::Fingerprint;
use shared_types::DocId;
use std::collections::BTreeMap;

/// Writes needed to make the catalog mirror the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub add: Vec<(DocId, Fingerprint)>,
    pub update: Vec<(DocId, Fingerprint)>,
    pub remove: Vec<DocId>,
    pub unchanged: usize,
}

impl SyncPlan {
    /// Output vectors are ordered by document id.
    pub fn compute(
        on_disk: &BTreeMap<DocId, Fingerprint>,
        in_store: &BTreeMap<DocId, Fingerprint>,
    ) -> Self {
        let mut plan = SyncPlan::default();

        for (id, fingerprint) in on_disk {
            match in_store.get(id) {
                None => plan.add.push((id.clone(), *fingerprint)),
                Some(stored) if stored != fingerprint => {
                    plan.update.push((id.clone(), *fingerprint))
                }
                Some(_) => plan.unchanged += 1,
            }
        }

        plan.remove = in_store
            .keys()
            .filter(|id| !on_disk.contains_key(*id))
            .cloned()
            .collect();

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.update.is_empty() && self.remove.is_empty()
    }
}
