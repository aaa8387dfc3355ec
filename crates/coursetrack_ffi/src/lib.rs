//! Flutter bridge for CourseTrack core.

pub mod api;
