//! Persisted snapshot envelope.
//!
//! # Responsibility
//! - Define the JSON shape written to the storage slot.
//! - Encode/decode the whole collection in one document.
//!
//! # Invariants
//! - Shape is `{"state":{"courses":[...]},"version":N}`.
//! - Only `SNAPSHOT_VERSION` is accepted on decode; there is no migration.

use crate::model::course::Course;
use serde::{Deserialize, Serialize};

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Persisted store state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseState {
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Versioned envelope around `CourseState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: CourseState,
    #[serde(default)]
    pub version: u32,
}

impl Snapshot {
    /// Wraps a collection in a current-version envelope.
    pub fn from_courses(courses: &[Course]) -> Self {
        Self {
            state: CourseState {
                courses: courses.to_vec(),
            },
            version: SNAPSHOT_VERSION,
        }
    }

    pub fn into_courses(self) -> Vec<Course> {
        self.state.courses
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
