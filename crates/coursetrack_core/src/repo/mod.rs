//! Storage abstractions and snapshot persistence.
//!
//! # Responsibility
//! - Define the key-value slot contract the store persists through.
//! - Provide memory, file and SQLite backends.
//! - Isolate snapshot encoding from store orchestration.
//!
//! # Invariants
//! - Backends treat slot values as opaque text.
//! - Storage APIs return semantic errors (`UnsupportedVersion`, `InvalidKey`)
//!   in addition to transport errors.

pub mod file_storage;
pub mod snapshot_repo;
pub mod sqlite_storage;
pub mod storage;
