//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep boundary/transport layers decoupled from storage details.

pub mod note_service;
