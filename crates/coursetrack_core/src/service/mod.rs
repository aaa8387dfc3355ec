//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate reducers and snapshot persistence into store operations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod course_store;
