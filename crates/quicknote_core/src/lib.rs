//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note invariants.

pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analytics::word_frequency::{analyze_word_frequency, WordFrequency};
pub use api::dto::{NoteFullResponse, NoteRequest, NoteShortResponse, PageResponse};
pub use api::error::ErrorResponse;
pub use api::notes::{ApiResult, NotesApi};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::note::{Note, NoteDraft, NoteId, NotePatch, NoteTag};
pub use model::page::{Page, PageRequest};
pub use model::validation::{ValidationErrors, TEXT_MAX_CHARS, TITLE_MAX_CHARS};
pub use repo::memory_repo::InMemoryNoteStore;
pub use repo::note_repo::{NoteStore, SqliteNoteStore, StoreError, StoreResult};
pub use service::note_service::{NoteService, NoteServiceError, ServiceConfig, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
