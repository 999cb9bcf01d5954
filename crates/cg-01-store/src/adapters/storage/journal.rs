use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// File header identifying a gateway journal.
const MAGIC: &[u8; 4] = b"CGJ1";

/// `[payload_len: u32 LE][crc32(payload): u32 LE]`
const FRAME_HEADER_LEN: usize = 8;

/// Don't bother compacting small journals.
const COMPACT_MIN_OPS: u64 = 1024;

/// Puts per frame when writing a compacted journal.
const COMPACT_FRAME_OPS: usize = 512;

/// Append-only journal key-value store.
///
/// Every write appends one checksummed frame holding a batch of operations,
/// so a batch is durable all-or-nothing. The full key space is replayed into
/// memory on open. A torn or corrupt tail frame is truncated. The journal is
/// rewritten on open once dead operations outnumber live keys.
pub struct JournalKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
    file: File,
    /// Length of the valid journal prefix.
    len: u64,
    sync_writes: bool,
}

/// State recovered from an existing journal.
struct Replay {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    valid_len: u64,
    ops: u64,
}

impl JournalKVStore {
    /// Open the journal at `path`, creating it if missing.
    pub fn open<P: AsRef<Path>>(path: P, sync_writes: bool) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(io_error)?;

        let file_len = file.metadata().map_err(io_error)?.len();
        let replay = Self::replay(&mut file)?;

        if replay.valid_len < file_len {
            tracing::warn!(
                "[cg-01] Truncating torn journal tail: {} -> {} bytes ({})",
                file_len,
                replay.valid_len,
                path.display()
            );
        }

        let mut store = Self {
            data: replay.data,
            path,
            file,
            len: replay.valid_len,
            sync_writes,
        };

        if store.len == 0 {
            store.write_header()?;
        } else if replay.valid_len < file_len {
            store.file.set_len(store.len).map_err(io_error)?;
        }

        let live = store.data.len() as u64;
        if replay.ops > COMPACT_MIN_OPS && replay.ops > live.saturating_mul(2) {
            tracing::info!(
                "[cg-01] Compacting journal: {} operations, {} live keys",
                replay.ops,
                live
            );
            store.compact()?;
        }

        store.file.seek(SeekFrom::Start(store.len)).map_err(io_error)?;

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn replay(file: &mut File) -> Result<Replay, KVStoreError> {
        let mut bytes = Vec::new();
        file.seek(SeekFrom::Start(0)).map_err(io_error)?;
        file.read_to_end(&mut bytes).map_err(io_error)?;

        let mut replay = Replay {
            data: BTreeMap::new(),
            valid_len: 0,
            ops: 0,
        };

        // A header shorter than MAGIC is a torn create; start over.
        if bytes.len() < MAGIC.len() {
            return Ok(replay);
        }
        if &bytes[..MAGIC.len()] != MAGIC {
            return Err(KVStoreError::CorruptionError {
                message: "not a gateway journal (bad magic)".to_string(),
            });
        }

        let mut cursor = MAGIC.len();
        while cursor + FRAME_HEADER_LEN <= bytes.len() {
            let payload_len = read_u32(&bytes[cursor..cursor + 4]) as usize;
            let expected_crc = read_u32(&bytes[cursor + 4..cursor + 8]);
            let start = cursor + FRAME_HEADER_LEN;
            let Some(end) = start.checked_add(payload_len) else {
                break;
            };
            if end > bytes.len() {
                break;
            }

            let payload = &bytes[start..end];
            if crc32fast::hash(payload) != expected_crc {
                break;
            }
            let Ok(ops) = bincode::deserialize::<Vec<BatchOperation>>(payload) else {
                break;
            };

            replay.ops += ops.len() as u64;
            apply(&mut replay.data, ops);
            cursor = end;
        }

        replay.valid_len = cursor as u64;
        Ok(replay)
    }

    fn write_header(&mut self) -> Result<(), KVStoreError> {
        self.file.set_len(0).map_err(io_error)?;
        self.file.seek(SeekFrom::Start(0)).map_err(io_error)?;
        self.file.write_all(MAGIC).map_err(io_error)?;
        self.file.sync_all().map_err(io_error)?;
        self.len = MAGIC.len() as u64;
        Ok(())
    }

    /// Append one frame. On failure the journal is cut back to its last
    /// valid length so later frames stay reachable on replay.
    fn append_frame(&mut self, ops: &[BatchOperation]) -> Result<(), KVStoreError> {
        let frame = encode_frame(ops)?;

        let result = self
            .file
            .write_all(&frame)
            .and_then(|_| {
                if self.sync_writes {
                    self.file.sync_data()
                } else {
                    Ok(())
                }
            });

        match result {
            Ok(()) => {
                self.len += frame.len() as u64;
                Ok(())
            }
            Err(e) => {
                let _ = self.file.set_len(self.len);
                let _ = self.file.seek(SeekFrom::Start(self.len));
                Err(io_error(e))
            }
        }
    }

    /// Rewrite the journal with one put per live key.
    fn compact(&mut self) -> Result<(), KVStoreError> {
        let temp_path = self.path.with_extension("compact");
        let mut temp = File::create(&temp_path).map_err(io_error)?;
        temp.write_all(MAGIC).map_err(io_error)?;

        let mut written = MAGIC.len() as u64;
        let live: Vec<BatchOperation> = self
            .data
            .iter()
            .map(|(k, v)| BatchOperation::put(k.clone(), v.clone()))
            .collect();
        for chunk in live.chunks(COMPACT_FRAME_OPS) {
            let frame = encode_frame(chunk)?;
            temp.write_all(&frame).map_err(io_error)?;
            written += frame.len() as u64;
        }
        temp.sync_all().map_err(io_error)?;
        drop(temp);

        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;

        self.file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(io_error)?;
        self.len = written;
        Ok(())
    }
}

impl KeyValueStore for JournalKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.atomic_batch_write(vec![BatchOperation::put(key, value)])
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.atomic_batch_write(vec![BatchOperation::delete(key)])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        if operations.is_empty() {
            return Ok(());
        }
        self.append_frame(&operations)?;
        apply(&mut self.data, operations);
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

fn apply(data: &mut BTreeMap<Vec<u8>, Vec<u8>>, ops: Vec<BatchOperation>) {
    for op in ops {
        match op {
            BatchOperation::Put { key, value } => {
                data.insert(key, value);
            }
            BatchOperation::Delete { key } => {
                data.remove(&key);
            }
        }
    }
}

fn encode_frame(ops: &[BatchOperation]) -> Result<Vec<u8>, KVStoreError> {
    let payload = bincode::serialize(ops).map_err(|e| KVStoreError::IOError {
        message: format!("failed to encode journal frame: {}", e),
    })?;
    let payload_len = u32::try_from(payload.len()).map_err(|_| KVStoreError::IOError {
        message: "journal frame exceeds 4 GiB".to_string(),
    })?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.extend_from_slice(&payload_len.to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}
