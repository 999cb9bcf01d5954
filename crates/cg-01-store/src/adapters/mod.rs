//! # Adapters
//!
//! - `storage`: `KeyValueStore` backends
//! - `lock`: process lock on the database file

pub mod lock;
pub mod storage;

pub use lock::{DatabaseLock, LockError};
pub use storage::{InMemoryKVStore, JournalKVStore};
#[cfg(feature = "rocksdb")]
pub use storage::RocksDbStore;
