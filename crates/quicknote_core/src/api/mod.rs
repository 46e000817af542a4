//! Boundary facade consumed by transports (HTTP handlers, CLI, bindings).
//!
//! # Responsibility
//! - Translate wire shapes to service calls and back.
//! - Keep error-to-status mapping in one place (`error`).

pub mod dto;
pub mod error;
pub mod notes;
