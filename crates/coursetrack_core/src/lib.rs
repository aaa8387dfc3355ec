//! Core domain logic for CourseTrack.
//! This crate is the single source of truth for the course list and its
//! persisted snapshot.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::course::{validate_title, Course, CourseId, CourseValidationError};
pub use model::snapshot::{CourseState, Snapshot, SNAPSHOT_VERSION};
pub use repo::file_storage::FileStorage;
pub use repo::snapshot_repo::SnapshotRepository;
pub use repo::sqlite_storage::SqliteStorage;
pub use repo::storage::{MemoryStorage, SnapshotStorage, StorageError, StorageResult};
pub use service::course_store::{CourseStore, StoreError, StoreResult, SubscriptionId};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
