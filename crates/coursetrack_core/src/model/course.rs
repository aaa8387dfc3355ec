//! Course domain model.
//!
//! # Responsibility
//! - Define the canonical record tracked by the course list.
//! - Validate creation-time input before a record enters the store.
//!
//! # Invariants
//! - `title` is non-empty (ignoring surrounding whitespace) for every record
//!   accepted by the store.
//! - `completed` starts as `false` and is read as `false` when absent from a
//!   persisted snapshot.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier used to target toggle/remove operations.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CourseId = u64;

/// Validation errors raised before a course is accepted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    /// Title was empty or whitespace-only.
    EmptyTitle,
}

impl Display for CourseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "course title must not be empty"),
        }
    }
}

impl Error for CourseValidationError {}

/// A tracked course: a title plus a completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Store-assigned identifier, unique within one collection.
    pub id: CourseId,
    /// User-facing label. Immutable after creation.
    pub title: String,
    /// Completion flag flipped by `toggle`.
    #[serde(default)]
    pub completed: bool,
}

impl Course {
    /// Creates an incomplete course with the given id.
    ///
    /// This constructor does not validate; call `validate()` before handing
    /// the record to storage.
    pub fn new(id: CourseId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }

    /// Checks creation-time invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), CourseValidationError> {
        validate_title(&self.title)
    }

    /// Returns a copy of this course with `completed` flipped.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Validates a raw title as typed into the creation form.
pub fn validate_title(title: &str) -> Result<(), CourseValidationError> {
    if title.trim().is_empty() {
        return Err(CourseValidationError::EmptyTitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_title, Course, CourseValidationError};

    #[test]
    fn new_course_starts_incomplete() {
        let course = Course::new(7, "Math");
        assert_eq!(course.id, 7);
        assert!(!course.completed);
        assert!(course.validate().is_ok());
    }

    #[test]
    fn whitespace_title_is_rejected() {
        assert_eq!(
            validate_title("   \t"),
            Err(CourseValidationError::EmptyTitle)
        );
        assert_eq!(
            Course::new(1, "").validate(),
            Err(CourseValidationError::EmptyTitle)
        );
    }

    #[test]
    fn toggled_only_flips_completed() {
        let course = Course::new(3, "Art");
        let flipped = course.toggled();
        assert_eq!(flipped.id, 3);
        assert_eq!(flipped.title, "Art");
        assert!(flipped.completed);
        assert_eq!(flipped.toggled(), course);
    }
}
