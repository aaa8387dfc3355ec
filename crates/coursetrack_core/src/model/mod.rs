//! Domain model for the course list.
//!
//! # Responsibility
//! - Define the canonical `Course` record and its persisted snapshot shape.
//! - Keep collection transitions as pure reducers, separate from storage.
//!
//! # Invariants
//! - The collection is an ordered sequence; append order is the only order.

pub mod course;
pub mod course_reducer;
pub mod snapshot;
