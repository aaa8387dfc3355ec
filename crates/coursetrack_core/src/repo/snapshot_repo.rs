//! Snapshot persistence over a key-value slot.
//!
//! # Responsibility
//! - Encode the full course collection into one slot value and back.
//! - Reject unreadable slots instead of masking them.
//!
//! # Invariants
//! - One slot holds the whole collection; writes replace it entirely.
//! - Decoding accepts only the current snapshot version.

use crate::model::course::Course;
use crate::model::snapshot::{Snapshot, SNAPSHOT_VERSION};
use crate::repo::storage::{SnapshotStorage, StorageError, StorageResult};

/// Reads and writes course snapshots under a fixed storage key.
pub struct SnapshotRepository<S: SnapshotStorage> {
    storage: S,
    key: String,
}

impl<S: SnapshotStorage> SnapshotRepository<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Loads the persisted collection.
    ///
    /// Returns `Ok(None)` when the slot has never been written.
    ///
    /// # Errors
    /// - Backend read failures.
    /// - `Decode` for malformed JSON.
    /// - `UnsupportedVersion` for snapshots written by another format version.
    pub fn load_courses(&self) -> StorageResult<Option<Vec<Course>>> {
        let Some(raw) = self.storage.load(&self.key)? else {
            return Ok(None);
        };

        let snapshot = Snapshot::decode(&raw).map_err(StorageError::Decode)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        Ok(Some(snapshot.into_courses()))
    }

    /// Replaces the slot with a snapshot of `courses`.
    pub fn save_courses(&mut self, courses: &[Course]) -> StorageResult<()> {
        let raw = Snapshot::from_courses(courses)
            .encode()
            .map_err(StorageError::Encode)?;
        self.storage.save(&self.key, &raw)
    }

    /// Deletes the slot.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.storage.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotRepository;
    use crate::model::course::Course;
    use crate::repo::storage::{MemoryStorage, StorageError};

    #[test]
    fn empty_slot_loads_as_none() {
        let repo = SnapshotRepository::new(MemoryStorage::new(), "courses");
        assert_eq!(repo.load_courses().unwrap(), None);
    }

    #[test]
    fn save_then_load_restores_collection() {
        let mut repo = SnapshotRepository::new(MemoryStorage::new(), "courses");
        let mut art = Course::new(2, "Art");
        art.completed = true;
        let courses = vec![Course::new(1, "Math"), art];

        repo.save_courses(&courses).unwrap();
        assert_eq!(repo.load_courses().unwrap(), Some(courses));
    }

    #[test]
    fn future_version_is_rejected() {
        let storage = MemoryStorage::with_entry(
            "courses",
            r#"{"state":{"courses":[]},"version":3}"#,
        );
        let repo = SnapshotRepository::new(storage, "courses");
        let err = repo.load_courses().unwrap_err();
        assert!(matches!(
            err,
            StorageError::UnsupportedVersion {
                found: 3,
                supported: 0
            }
        ));
    }

    #[test]
    fn garbage_slot_is_a_decode_error() {
        let storage = MemoryStorage::with_entry("courses", "not json");
        let repo = SnapshotRepository::new(storage, "courses");
        assert!(matches!(
            repo.load_courses().unwrap_err(),
            StorageError::Decode(_)
        ));
    }
}
