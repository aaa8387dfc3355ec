//! Store configuration.

/// Storage key used when no override is configured.
pub const DEFAULT_STORAGE_KEY: &str = "courses";

/// Options applied when opening a `CourseStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Slot name the snapshot is persisted under.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
