//! # Gateway Store (cg-01)
//!
//! Durable, process-wide state of the gateway: users, role membership,
//! consent, the document catalog and the append-only action log.
//!
//! ## Architecture
//!
//! - `domain`: records, key layout, errors, configuration
//! - `ports`: `GatewayStoreApi` (inbound), `KeyValueStore` / `TimeSource` (outbound)
//! - `adapters`: journal file, in-memory and RocksDB key-value stores, process lock
//! - `service`: `GatewayStore`, the single writer of all persisted state
//!
//! ## Usage
//!
//! ```no_run
//! use cg_01_store::{GatewayStore, GatewayStoreApi, StoreConfig};
//!
//! # async fn run() -> Result<(), cg_01_store::StoreError> {
//! let store = GatewayStore::open(&StoreConfig::new("./data/gateway.db"))?;
//! if !store.has_consent(42).await? {
//!     store.grant_consent(42).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{DatabaseLock, InMemoryKVStore, JournalKVStore, LockError};
#[cfg(feature = "rocksdb")]
pub use adapters::RocksDbStore;
pub use domain::config::{StoreConfig, SCHEMA_VERSION};
pub use domain::entities::{ActionLogRecord, Document, Fingerprint, NewActionLogRecord, User};
pub use domain::errors::{KVStoreError, StoreError};
pub use domain::keys::KeyPrefix;
pub use ports::inbound::GatewayStoreApi;
pub use ports::outbound::{
    BatchOperation, FixedTimeSource, KeyValueStore, ScanResult, SystemTimeSource, TimeSource,
};
pub use service::{FileGatewayStore, GatewayStore};
