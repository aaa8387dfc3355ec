//! Key-value storage contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the `load`/`save`/`remove` seam the store persists through.
//! - Provide one error type shared by every backend.
//!
//! # Invariants
//! - Values are opaque UTF-8 text; backends never interpret them.
//! - `load` of a missing key is `Ok(None)`, not an error.
//! - `remove` of a missing key is a no-op.

use crate::db::DbError;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by a storage backend or by snapshot encoding.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Db(DbError),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    UnsupportedVersion { found: u32, supported: u32 },
    InvalidKey(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io failed: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Decode(err) => write!(f, "failed to decode snapshot: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "snapshot version {found} is not supported (expected {supported})"
            ),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::UnsupportedVersion { .. } | Self::InvalidKey(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value slot store used for snapshot persistence.
pub trait SnapshotStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for Box<S> {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Process-local storage. Contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.into(), value.into());
        storage
    }

    /// Returns the raw stored value, for inspection.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
