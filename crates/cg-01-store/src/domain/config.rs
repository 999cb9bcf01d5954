//! # Store Configuration

use std::path::PathBuf;

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Location of the backing journal file.
    pub db_path: PathBuf,

    /// fsync after every write (default: true).
    pub sync_writes: bool,

    /// Take an exclusive process lock next to `db_path` (default: true).
    pub lock: bool,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            sync_writes: true,
            lock: true,
        }
    }

    /// Disable fsync on write. Tests only.
    pub fn without_sync(mut self) -> Self {
        self.sync_writes = false;
        self
    }

    /// Skip the process lock.
    pub fn without_lock(mut self) -> Self {
        self.lock = false;
        self
    }

    /// Path of the lock file guarding `db_path`.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .db_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.db_path.with_file_name(name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("./data/gateway.db")
    }
}
