//! Directory-backed storage: one `<key>.json` file per slot.
//!
//! # Invariants
//! - Writes go to a sibling temp file and are renamed into place, so a
//!   reader never observes a half-written slot.
//! - Keys must be plain file stems (no separators, no leading dot).

use crate::repo::storage::{SnapshotStorage, StorageError, StorageResult};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SLOT_EXTENSION: &str = "json";

/// Storage that keeps each slot as a human-readable JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` as the slot directory, creating it when missing.
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the file path backing `key`.
    pub fn slot_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{SLOT_EXTENSION}")))
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        let tmp_path = path.with_extension(format!("{SLOT_EXTENSION}.tmp"));
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        debug!(
            "event=slot_write module=storage backend=file bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty() && !key.starts_with('.') && !key.contains(['/', '\\']);
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
