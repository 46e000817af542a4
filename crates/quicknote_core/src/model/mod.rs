//! Note domain model.
//!
//! # Responsibility
//! - Define the note record, its tag vocabulary and update request shapes.
//! - Own field validation and pagination value types.
//!
//! # Invariants
//! - Every persisted note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
pub mod page;
pub mod validation;
