//! SQLite-backed storage over the `kv_store` table.
//!
//! # Responsibility
//! - Keep slot values as TEXT rows keyed by slot name.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - The connection has migrations applied (`open_db`/`open_db_in_memory`).
//! - `save` is an upsert; last writer wins.

use crate::db::{open_db, open_db_in_memory};
use crate::repo::storage::{SnapshotStorage, StorageResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite slot storage owning its connection.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wraps an already bootstrapped connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SnapshotStorage for SqliteStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!(
            "event=slot_write module=storage backend=sqlite bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStorage;
    use crate::repo::storage::SnapshotStorage;

    #[test]
    fn upsert_replaces_existing_value() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.save("courses", "first").unwrap();
        storage.save("courses", "second").unwrap();

        assert_eq!(storage.load("courses").unwrap().as_deref(), Some("second"));
        let rows: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.remove("courses").unwrap();
        assert_eq!(storage.load("courses").unwrap(), None);
    }
}
