//! Document catalog.

use super::{encode, StoreState};
use crate::domain::entities::{Document, Fingerprint};
use crate::domain::errors::StoreError;
use crate::domain::keys::KeyPrefix;
use crate::ports::outbound::{KeyValueStore, TimeSource};
use shared_types::DocId;
use std::collections::BTreeSet;

impl<KV, TS> StoreState<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    pub(crate) fn upsert_document(
        &mut self,
        doc_id: &str,
        fingerprint: Fingerprint,
    ) -> Result<(), StoreError> {
        let key = KeyPrefix::document_key(doc_id)?;
        let document = Document {
            id: doc_id.to_string(),
            fingerprint,
            synced_at: self.time.now(),
        };
        self.kv.put(&key, &encode(&document)?)?;
        Ok(())
    }

    pub(crate) fn delete_document(&mut self, doc_id: &str) -> Result<(), StoreError> {
        let key = KeyPrefix::document_key(doc_id)?;
        self.kv.delete(&key)?;
        Ok(())
    }

    pub(crate) fn list_document_ids(&self) -> Result<BTreeSet<DocId>, StoreError> {
        self.kv
            .prefix_scan(KeyPrefix::DOCUMENT)?
            .into_iter()
            .map(|(key, _)| {
                String::from_utf8(key[KeyPrefix::DOCUMENT.len()..].to_vec()).map_err(|e| {
                    StoreError::SerializationError {
                        message: format!("document id is not UTF-8: {}", e),
                    }
                })
            })
            .collect()
    }

    pub(crate) fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        self.kv
            .prefix_scan(KeyPrefix::DOCUMENT)?
            .into_iter()
            .map(|(_, raw)| Ok(bincode::deserialize::<Document>(&raw)?))
            .collect()
    }
}
