//! # Directory Scanner
//!
//! Filesystem `DocumentSource`. Fingerprint = size + SHA-256 of the content,
//! so touching a file without modifying it is not a change.

use crate::domain::config::ScanOptions;
use crate::domain::errors::{SyncError, SyncWarning};
use crate::ports::outbound::{DocumentSnapshot, DocumentSource};
use cg_01_store::Fingerprint;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const READ_CHUNK: usize = 64 * 1024;

/// Scans one directory, optionally recursively.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl DirectoryScanner {
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk `dir`, whose document ids start with `prefix`.
    fn walk(&self, dir: &Path, prefix: &str, snapshot: &mut DocumentSnapshot) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                snapshot.warnings.push(SyncWarning::new(dir, e));
                return;
            }
        };
        self.visit(entries, prefix, snapshot);
    }

    fn visit(&self, entries: std::fs::ReadDir, prefix: &str, snapshot: &mut DocumentSnapshot) {
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    snapshot.warnings.push(SyncWarning::new(&self.root, e));
                    continue;
                }
            };
            let path = entry.path();

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                snapshot
                    .warnings
                    .push(SyncWarning::new(&path, "file name is not valid UTF-8"));
                continue;
            };
            if name.starts_with('.') && !self.options.include_hidden {
                continue;
            }

            // Follows symlinks.
            let metadata = match std::fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    snapshot.warnings.push(SyncWarning::new(&path, e));
                    continue;
                }
            };

            let doc_id = format!("{}{}", prefix, name);
            if metadata.is_dir() {
                if self.options.recursive {
                    self.walk(&path, &format!("{}/", doc_id), snapshot);
                }
            } else if metadata.is_file() {
                match fingerprint_file(&path) {
                    Ok(fingerprint) => {
                        snapshot.files.insert(doc_id, fingerprint);
                    }
                    Err(e) => snapshot.warnings.push(SyncWarning::new(&path, e)),
                }
            }
        }
    }
}

impl DocumentSource for DirectoryScanner {
    fn scan(&self) -> Result<DocumentSnapshot, SyncError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| {
            if self.root.is_file() {
                SyncError::NotADirectory {
                    path: self.root.clone(),
                }
            } else {
                SyncError::DirectoryUnreadable {
                    path: self.root.clone(),
                    source,
                }
            }
        })?;

        let mut snapshot = DocumentSnapshot::default();
        self.visit(entries, "", &mut snapshot);
        Ok(snapshot)
    }
}

/// Stream the file through SHA-256.
pub fn fingerprint_file(path: &Path) -> std::io::Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];
    let mut size = 0u64;

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }

    Ok(Fingerprint::new(size, hasher.finalize().into()))
}
