//! Shared fixtures.

use cg_01_store::{
    BatchOperation, GatewayStore, InMemoryKVStore, KVStoreError, KeyValueStore, ScanResult,
    SystemTimeSource,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory KV that counts mutating calls.
#[derive(Default)]
pub struct CountingKV {
    inner: InMemoryKVStore,
    writes: Arc<AtomicUsize>,
}

impl CountingKV {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let kv = Self::default();
        let writes = Arc::clone(&kv.writes);
        (kv, writes)
    }
}

impl KeyValueStore for CountingKV {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.atomic_batch_write(operations)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        self.inner.prefix_scan(prefix)
    }
}

pub type CountingStore = GatewayStore<CountingKV, SystemTimeSource>;

/// Store over `CountingKV` plus its write counter. Schema setup writes are
/// already counted when this returns.
pub fn counting_store() -> (Arc<CountingStore>, Arc<AtomicUsize>) {
    let (kv, writes) = CountingKV::new();
    let store = GatewayStore::new(kv, SystemTimeSource).unwrap();
    (Arc::new(store), writes)
}
