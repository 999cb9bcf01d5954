//! Append-only action log.

use super::{encode, StoreState};
use crate::domain::entities::{ActionLogRecord, NewActionLogRecord};
use crate::domain::errors::StoreError;
use crate::domain::keys::KeyPrefix;
use crate::ports::outbound::{BatchOperation, KeyValueStore, TimeSource};
use shared_types::UserId;

impl<KV, TS> StoreState<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// The record and the sequence marker are written in one batch, so a
    /// crash never leaves a gap or a reused sequence.
    pub(crate) fn append_action_log(
        &mut self,
        record: NewActionLogRecord,
    ) -> Result<u64, StoreError> {
        let seq = self.last_seq + 1;
        let record = ActionLogRecord::from_new(seq, record);

        self.kv.atomic_batch_write(vec![
            BatchOperation::put(KeyPrefix::action_log_key(seq), encode(&record)?),
            BatchOperation::put(KeyPrefix::LOG_SEQ_KEY, seq.to_be_bytes().to_vec()),
        ])?;

        self.last_seq = seq;
        Ok(seq)
    }

    /// Newest first, optionally restricted to one user.
    pub(crate) fn list_action_log(
        &self,
        limit: usize,
        user_id: Option<UserId>,
    ) -> Result<Vec<ActionLogRecord>, StoreError> {
        let mut records = Vec::with_capacity(limit.min(64));

        for (_, raw) in self.kv.prefix_scan(KeyPrefix::ACTION_LOG)?.into_iter().rev() {
            if records.len() >= limit {
                break;
            }
            let record: ActionLogRecord = bincode::deserialize(&raw)?;
            if user_id.map_or(true, |id| id == record.user_id) {
                records.push(record);
            }
        }

        Ok(records)
    }
}
