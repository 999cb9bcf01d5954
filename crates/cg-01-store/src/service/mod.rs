//! # Gateway Store Service
//!
//! `GatewayStore` implements `GatewayStoreApi` on top of any `KeyValueStore`.
//!
//! All state sits behind one `parking_lot::Mutex`. Every operation is a short
//! synchronous critical section (no `.await` while the lock is held), which
//! gives per-row atomicity and serializes action-log appends.
//!
//! Critical sections run on the blocking pool, so a slow disk never stalls a
//! runtime worker and callers can bound a call with `tokio::time::timeout`.
//! A call abandoned by its caller still runs to completion.

mod audit;
mod documents;
mod users;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{DocId, UserId, UserProfile};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::adapters::lock::DatabaseLock;
use crate::adapters::storage::{InMemoryKVStore, JournalKVStore};
use crate::domain::config::{StoreConfig, SCHEMA_VERSION};
use crate::domain::entities::{ActionLogRecord, Document, Fingerprint, NewActionLogRecord, User};
use crate::domain::errors::{KVStoreError, StoreError};
use crate::domain::keys::KeyPrefix;
use crate::ports::inbound::GatewayStoreApi;
use crate::ports::outbound::{KeyValueStore, SystemTimeSource, TimeSource};

/// Store backed by the on-disk journal.
pub type FileGatewayStore = GatewayStore<JournalKVStore, SystemTimeSource>;

/// The persistent store of the gateway.
pub struct GatewayStore<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    state: Arc<Mutex<StoreState<KV, TS>>>,
    /// Whether `open` found no prior store and wrote a fresh schema.
    created: bool,
}

/// Mutable state guarded by the store mutex.
pub(crate) struct StoreState<KV, TS> {
    pub(crate) kv: KV,
    pub(crate) time: TS,
    /// Last assigned action log sequence, 0 when the log is empty.
    pub(crate) last_seq: u64,
    /// Released only after the last in-flight call finishes.
    _lock: Option<DatabaseLock>,
}

impl FileGatewayStore {
    /// Open the store at `config.db_path`, creating it if it does not exist.
    ///
    /// An existing store is opened unmodified apart from journal recovery.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let lock = if config.lock {
            if let Some(parent) = config.db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| StoreError::DatabaseError {
                        message: format!("cannot create {}: {}", parent.display(), e),
                    })?;
                }
            }
            let lock = DatabaseLock::acquire(&config.lock_path()).map_err(|e| {
                StoreError::DatabaseLocked {
                    message: e.to_string(),
                }
            })?;
            Some(lock)
        } else {
            None
        };

        let kv = JournalKVStore::open(&config.db_path, config.sync_writes)?;
        let store = Self::init(kv, SystemTimeSource, lock)?;

        tracing::debug!(
            "[cg-01] Store opened at {} (created: {})",
            config.db_path.display(),
            store.created
        );
        Ok(store)
    }
}

impl GatewayStore<InMemoryKVStore, SystemTimeSource> {
    /// Volatile store for tests and dry runs.
    pub fn in_memory() -> Self {
        Self::from_parts(InMemoryKVStore::new(), SystemTimeSource, true, 0, None)
    }
}

impl<KV, TS> GatewayStore<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Wrap an already opened key-value store.
    ///
    /// Writes the schema marker into an empty store and verifies it otherwise.
    pub fn new(kv: KV, time: TS) -> Result<Self, StoreError> {
        Self::init(kv, time, None)
    }

    fn init(mut kv: KV, time: TS, lock: Option<DatabaseLock>) -> Result<Self, StoreError> {
        let created = match kv.get(KeyPrefix::SCHEMA_VERSION_KEY)? {
            None => {
                kv.put(KeyPrefix::SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_be_bytes())?;
                true
            }
            Some(raw) => {
                let found = decode_u32(&raw)?;
                if found != SCHEMA_VERSION {
                    return Err(StoreError::SchemaMismatch {
                        found,
                        expected: SCHEMA_VERSION,
                    });
                }
                false
            }
        };

        let last_seq = match kv.get(KeyPrefix::LOG_SEQ_KEY)? {
            Some(raw) => decode_u64(&raw)?,
            None => 0,
        };

        Ok(Self::from_parts(kv, time, created, last_seq, lock))
    }

    fn from_parts(
        kv: KV,
        time: TS,
        created: bool,
        last_seq: u64,
        lock: Option<DatabaseLock>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                kv,
                time,
                last_seq,
                _lock: lock,
            })),
            created,
        }
    }

    /// True if this process created the store.
    pub fn was_created(&self) -> bool {
        self.created
    }
}

impl<KV, TS> GatewayStore<KV, TS>
where
    KV: KeyValueStore + 'static,
    TS: TimeSource + 'static,
{
    /// Run one critical section on the blocking pool.
    async fn with_state<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut StoreState<KV, TS>) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || f(&mut state.lock()))
            .await
            .map_err(|e| StoreError::DatabaseError {
                message: format!("store task failed: {}", e),
            })?
    }
}

impl<KV, TS> StoreState<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        key: &[u8],
    ) -> Result<Option<T>, StoreError> {
        match self.kv.get(key)? {
            Some(raw) => Ok(Some(bincode::deserialize(&raw)?)),
            None => Ok(None),
        }
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(value)?)
}

fn decode_u32(raw: &[u8]) -> Result<u32, StoreError> {
    let bytes: [u8; 4] = raw.try_into().map_err(|_| corrupt_meta("schema version"))?;
    Ok(u32::from_be_bytes(bytes))
}

fn decode_u64(raw: &[u8]) -> Result<u64, StoreError> {
    let bytes: [u8; 8] = raw.try_into().map_err(|_| corrupt_meta("action log sequence"))?;
    Ok(u64::from_be_bytes(bytes))
}

fn corrupt_meta(what: &str) -> StoreError {
    KVStoreError::CorruptionError {
        message: format!("malformed {} marker", what),
    }
    .into()
}

#[async_trait]
impl<KV, TS> GatewayStoreApi for GatewayStore<KV, TS>
where
    KV: KeyValueStore + 'static,
    TS: TimeSource + 'static,
{
    async fn ensure_user(
        &self,
        user_id: UserId,
        profile: &UserProfile,
    ) -> Result<User, StoreError> {
        let profile = profile.clone();
        self.with_state(move |s| s.ensure_user(user_id, &profile))
            .await
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, StoreError> {
        self.with_state(move |s| s.get_user(user_id)).await
    }

    async fn list_user_ids_by_role(&self, role: &str) -> Result<BTreeSet<UserId>, StoreError> {
        let role = role.to_string();
        self.with_state(move |s| s.list_user_ids_by_role(&role))
            .await
    }

    async fn assign_role(&self, user_id: UserId, role: &str) -> Result<(), StoreError> {
        let role = role.to_string();
        self.with_state(move |s| s.assign_role(user_id, &role))
            .await
    }

    async fn has_consent(&self, user_id: UserId) -> Result<bool, StoreError> {
        self.with_state(move |s| s.has_consent(user_id)).await
    }

    async fn grant_consent(&self, user_id: UserId) -> Result<(), StoreError> {
        self.with_state(move |s| s.grant_consent(user_id)).await
    }

    async fn upsert_document(
        &self,
        doc_id: &str,
        fingerprint: Fingerprint,
    ) -> Result<(), StoreError> {
        let doc_id = doc_id.to_string();
        self.with_state(move |s| s.upsert_document(&doc_id, fingerprint))
            .await
    }

    async fn delete_document(&self, doc_id: &str) -> Result<(), StoreError> {
        let doc_id = doc_id.to_string();
        self.with_state(move |s| s.delete_document(&doc_id)).await
    }

    async fn list_document_ids(&self) -> Result<BTreeSet<DocId>, StoreError> {
        self.with_state(|s| s.list_document_ids()).await
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        self.with_state(|s| s.list_documents()).await
    }

    async fn append_action_log(&self, record: NewActionLogRecord) -> Result<u64, StoreError> {
        self.with_state(move |s| s.append_action_log(record)).await
    }

    async fn action_log_len(&self) -> Result<u64, StoreError> {
        Ok(self.state.lock().last_seq)
    }

    async fn list_action_log(&self, limit: usize) -> Result<Vec<ActionLogRecord>, StoreError> {
        self.with_state(move |s| s.list_action_log(limit, None))
            .await
    }

    async fn list_action_log_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<ActionLogRecord>, StoreError> {
        self.with_state(move |s| s.list_action_log(limit, Some(user_id)))
            .await
    }
}
