//! Users, role membership and consent.

use super::{encode, StoreState};
use crate::domain::entities::User;
use crate::domain::errors::StoreError;
use crate::domain::keys::KeyPrefix;
use crate::ports::outbound::{BatchOperation, KeyValueStore, TimeSource};
use shared_types::{UserId, UserProfile};
use std::collections::BTreeSet;

impl<KV, TS> StoreState<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    pub(crate) fn ensure_user(
        &mut self,
        user_id: UserId,
        profile: &UserProfile,
    ) -> Result<User, StoreError> {
        let key = KeyPrefix::user_key(user_id);

        match self.get_record::<User>(&key)? {
            Some(mut user) => {
                if user.refresh_profile(profile) {
                    self.kv.put(&key, &encode(&user)?)?;
                }
                Ok(user)
            }
            None => {
                let user = User::new(user_id, profile.clone(), self.time.now());
                self.kv.put(&key, &encode(&user)?)?;
                tracing::debug!(user_id, "[cg-01] New user recorded");
                Ok(user)
            }
        }
    }

    pub(crate) fn get_user(&self, user_id: UserId) -> Result<Option<User>, StoreError> {
        self.get_record(&KeyPrefix::user_key(user_id))
    }

    fn load_or_new_user(&self, user_id: UserId) -> Result<User, StoreError> {
        Ok(self
            .get_user(user_id)?
            .unwrap_or_else(|| User::new(user_id, UserProfile::default(), self.time.now())))
    }

    pub(crate) fn list_user_ids_by_role(&self, role: &str) -> Result<BTreeSet<UserId>, StoreError> {
        // A name that cannot be a key cannot have members.
        let Ok(prefix) = KeyPrefix::role_prefix(role) else {
            return Ok(BTreeSet::new());
        };

        Ok(self
            .kv
            .prefix_scan(&prefix)?
            .into_iter()
            .filter(|(key, _)| key.len() == prefix.len() + 8)
            .filter_map(|(key, _)| KeyPrefix::parse_role_member(&key))
            .collect())
    }

    /// User record and membership index are written in one batch.
    pub(crate) fn assign_role(&mut self, user_id: UserId, role: &str) -> Result<(), StoreError> {
        let member_key = KeyPrefix::role_member_key(role, user_id)?;
        let mut user = self.load_or_new_user(user_id)?;

        if user.has_role(role) && self.kv.exists(&member_key)? {
            return Ok(());
        }

        user.roles.insert(role.to_string());
        self.kv.atomic_batch_write(vec![
            BatchOperation::put(KeyPrefix::user_key(user_id), encode(&user)?),
            BatchOperation::put(member_key, Vec::new()),
        ])?;

        tracing::info!(user_id, role, "[cg-01] Role assigned");
        Ok(())
    }

    pub(crate) fn has_consent(&self, user_id: UserId) -> Result<bool, StoreError> {
        Ok(self.get_user(user_id)?.map(|u| u.consent).unwrap_or(false))
    }

    pub(crate) fn grant_consent(&mut self, user_id: UserId) -> Result<(), StoreError> {
        let mut user = self.load_or_new_user(user_id)?;
        if user.consent {
            return Ok(());
        }

        user.consent = true;
        user.consent_granted_at = Some(self.time.now());
        self.kv
            .put(&KeyPrefix::user_key(user_id), &encode(&user)?)?;

        tracing::info!(user_id, "[cg-01] Consent granted");
        Ok(())
    }
}
