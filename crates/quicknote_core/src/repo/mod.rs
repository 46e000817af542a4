//! Note store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store contract consumed by the note service.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Stores return `None`/empty pages for unknown ids; `NotFound` is a
//!   service-level decision.
//! - Both implementations share the same listing order.

pub mod memory_repo;
pub mod note_repo;
