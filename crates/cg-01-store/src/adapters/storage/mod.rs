//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` trait.

mod journal;
mod memory;
#[cfg(feature = "rocksdb")]
mod rocksdb;

pub use journal::JournalKVStore;
pub use memory::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use self::rocksdb::RocksDbStore;
