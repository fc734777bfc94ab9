use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::WalletError;

/// A persisted `(data, signature)` pair proving a transfer was signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRecord {
    pub data: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Append-only store of signed records, readable in insertion order.
pub trait RecordStore: Send + Sync {
    fn append(&self, record: SignedRecord) -> Result<(), WalletError>;

    /// The earliest record, if any has been appended.
    fn first(&self) -> Result<Option<SignedRecord>, WalletError>;
}

/// On-disk line format: one JSON object with hex fields per record.
#[derive(Serialize, Deserialize)]
struct RecordLine {
    data: String,
    signature: String,
}

/// Records stored as JSON lines in a single file.
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRecordStore {
    /// Start a fresh store at `path`, discarding any previous records.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(&path)?;
        Ok(Self::open(path))
    }

    /// Use an existing store; the file is created on first append.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }
}

impl RecordStore for FileRecordStore {
    fn append(&self, record: SignedRecord) -> Result<(), WalletError> {
        let line = serde_json::to_string(&RecordLine {
            data: hex::encode(&record.data),
            signature: hex::encode(&record.signature),
        })?;

        let _guard = self.write_lock.lock().expect("mutex poisoned");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn first(&self) -> Result<Option<SignedRecord>, WalletError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed: RecordLine = serde_json::from_str(&line)?;
            return Ok(Some(SignedRecord {
                data: hex::decode(parsed.data)?,
                signature: hex::decode(parsed.signature)?,
            }));
        }
        Ok(None)
    }
}

/// In-memory store used by tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<SignedRecord>>,
}

#[cfg(test)]
impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("mutex poisoned").len()
    }
}

#[cfg(test)]
impl RecordStore for MemoryRecordStore {
    fn append(&self, record: SignedRecord) -> Result<(), WalletError> {
        self.records.lock().expect("mutex poisoned").push(record);
        Ok(())
    }

    fn first(&self) -> Result<Option<SignedRecord>, WalletError> {
        Ok(self.records.lock().expect("mutex poisoned").first().cloned())
    }
}
