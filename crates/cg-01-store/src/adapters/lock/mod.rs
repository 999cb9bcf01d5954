//! # Database Process Locking
//!
//! Prevents two gateway processes from writing the same database file.
//! The lock is an fs2 exclusive lock on `<db_path>.lock`, holding the PID of
//! the owner. The flock alone decides ownership: the kernel drops it when the
//! holder exits, so a leftover file never needs removing. The PID is only
//! reported in errors.

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;


/// How long `acquire` waits for a live holder to let go.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(5);

/// Errors from database locking
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Failed to create lock file: {0}")]
    CreateFailed(#[source] io::Error),

    #[error("Database already in use by process {} ({})", pid.map(|p| p.to_string()).unwrap_or_else(|| "?".into()), path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}

/// Exclusive lock on a database file, released on drop.
pub struct DatabaseLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DatabaseLock {
    /// Acquire the lock at `lock_path`, waiting up to `DEFAULT_LOCK_WAIT`.
    pub fn acquire(lock_path: &Path) -> Result<Self, LockError> {
        Self::acquire_with_timeout(lock_path, DEFAULT_LOCK_WAIT)
    }

    /// Acquire the lock, retrying with capped exponential backoff until
    /// `timeout` elapses.
    pub fn acquire_with_timeout(lock_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let deadline = Instant::now() + timeout;
        let mut retry_delay = Duration::from_millis(20);

        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(lock_path)
                .map_err(LockError::CreateFailed)?;

            if file.try_lock_exclusive().is_ok() {
                let pid = std::process::id();
                let mut locked_file = file;
                locked_file.set_len(0).map_err(LockError::WriteFailed)?;
                locked_file
                    .seek(SeekFrom::Start(0))
                    .map_err(LockError::WriteFailed)?;
                writeln!(locked_file, "{}", pid).map_err(LockError::WriteFailed)?;
                locked_file.sync_all().map_err(LockError::WriteFailed)?;

                return Ok(Self {
                    file: locked_file,
                    path: lock_path.to_path_buf(),
                    pid,
                });
            }

            drop(file);

            if Instant::now() >= deadline {
                let pid = read_existing_pid(lock_path);
                tracing::warn!(
                    "[cg-01] Database lock {} still held by process {:?}",
                    lock_path.display(),
                    pid
                );
                return Err(LockError::AlreadyLocked {
                    pid,
                    path: lock_path.to_path_buf(),
                });
            }

            std::thread::sleep(retry_delay);
            retry_delay = (retry_delay * 2).min(Duration::from_millis(500));
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The file stays behind: unlinking it could split waiters across two inodes.
impl Drop for DatabaseLock {
    fn drop(&mut self) {
        #[allow(clippy::incompatible_msrv)]
        let _ = FileExt::unlock(&self.file);
    }
}

fn read_existing_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}
