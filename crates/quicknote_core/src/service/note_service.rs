//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/patch/delete and word statistics for notes.
//! - Own entity invariants, the partial-update merge policy and page shaping.
//!
//! # Invariants
//! - `id` and `created_at` are never changed by updates.
//! - Missing notes always surface as `NoteServiceError::NotFound`, never as an
//!   empty success.
//! - Delete is idempotent.
//! - The service holds no mutable state; concurrency is the store's concern.

use crate::analytics::word_frequency::{analyze_word_frequency, WordFrequency};
use crate::model::note::{Note, NoteDraft, NoteId, NotePatch, NoteTag};
use crate::model::page::{Page, PageRequest};
use crate::model::validation::ValidationErrors;
use crate::repo::note_repo::{NoteStore, StoreError};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Page size applied when callers ask for a zero-sized page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NotFound(NoteId),
    /// Title/text violate field rules; every violated field is reported.
    Validation(ValidationErrors),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found with id: {id}"),
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(errors) => Some(errors),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ValidationErrors> for NoteServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Tunables for [`NoteService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Used in place of a requested page size of 0.
    pub default_page_size: u32,
    /// When `true`, supplied patch fields must pass the same title/text rules
    /// as a full update. When `false`, patch values are applied verbatim.
    pub validate_partial_updates: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            validate_partial_updates: true,
        }
    }
}

/// Note service facade over a store implementation.
pub struct NoteService<S: NoteStore> {
    store: S,
    config: ServiceConfig,
}

impl<S: NoteStore> NoteService<S> {
    /// Creates a service with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates one note stamped with the current time.
    ///
    /// # Errors
    /// - `Validation` when title/text are blank or too long; nothing is written.
    pub fn create_note(&self, draft: NoteDraft) -> ServiceResult<Note> {
        debug!(
            "event=note_create module=service status=start title_chars={} text_chars={} tags={}",
            draft.title.chars().count(),
            draft.text.chars().count(),
            draft.tags.len()
        );
        if let Err(errors) = draft.validate() {
            warn!(
                "event=note_create module=service status=rejected error_code=validation fields={}",
                errors.len()
            );
            return Err(errors.into());
        }

        let note = Note::new(draft.title, draft.text, draft.tags);
        let saved = self.store.save(&note)?;
        info!(
            "event=note_create module=service status=ok note_id={}",
            display_id(&saved)
        );
        Ok(saved)
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> ServiceResult<Note> {
        debug!("event=note_get module=service status=start note_id={id}");
        self.require_note(id, "note_get")
    }

    /// Lists notes newest first, optionally keeping only notes that carry at
    /// least one of `tags`.
    ///
    /// A `size` of 0 is replaced by the configured default page size. Pages past
    /// the end come back empty with the real total.
    pub fn list_notes(
        &self,
        tags: Option<&BTreeSet<NoteTag>>,
        page: u32,
        size: u32,
    ) -> ServiceResult<Page<Note>> {
        let request = PageRequest::new(page, self.normalize_page_size(size));
        let result = match tags.filter(|tags| !tags.is_empty()) {
            None => {
                debug!("event=note_list module=service status=start filter=none");
                self.store.find_all(&request)?
            }
            Some(tags) => {
                debug!(
                    "event=note_list module=service status=start filter={}",
                    format_tags(tags)
                );
                self.store.find_by_tags_in(tags, &request)?
            }
        };

        info!(
            "event=note_list module=service status=ok page={} size={} returned={} total={}",
            request.page,
            request.size,
            result.number_of_elements(),
            result.total_elements
        );
        Ok(result)
    }

    /// Replaces title, text and tags of an existing note.
    ///
    /// # Errors
    /// - `Validation` is checked before the lookup, so invalid input against a
    ///   missing id reports validation first.
    /// - `NotFound` when `id` does not exist.
    pub fn update_note(&self, id: NoteId, draft: NoteDraft) -> ServiceResult<Note> {
        if let Err(errors) = draft.validate() {
            warn!(
                "event=note_update module=service status=rejected note_id={id} error_code=validation fields={}",
                errors.len()
            );
            return Err(errors.into());
        }

        let mut note = self.require_note(id, "note_update")?;
        draft.apply_to(&mut note);
        let saved = self.store.save(&note)?;
        info!("event=note_update module=service status=ok note_id={id} mode=full");
        Ok(saved)
    }

    /// Merges the present fields of `patch` into an existing note.
    ///
    /// An empty patch is a successful no-op for existing notes and is not
    /// written back.
    pub fn patch_note(&self, id: NoteId, patch: NotePatch) -> ServiceResult<Note> {
        if self.config.validate_partial_updates {
            if let Err(errors) = patch.validate() {
                warn!(
                    "event=note_update module=service status=rejected note_id={id} mode=partial error_code=validation fields={}",
                    errors.len()
                );
                return Err(errors.into());
            }
        }

        let mut note = self.require_note(id, "note_update")?;
        if patch.is_empty() {
            debug!("event=note_update module=service status=noop note_id={id} mode=partial");
            return Ok(note);
        }

        patch.apply_to(&mut note);
        let saved = self.store.save(&note)?;
        info!("event=note_update module=service status=ok note_id={id} mode=partial");
        Ok(saved)
    }

    /// Deletes a note. Unknown ids succeed without effect.
    pub fn delete_note(&self, id: NoteId) -> ServiceResult<()> {
        self.store.delete_by_id(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Computes word statistics for the body text of note `id`.
    pub fn word_frequency(&self, id: NoteId) -> ServiceResult<WordFrequency> {
        let note = self.require_note(id, "note_stats")?;
        let stats = analyze_word_frequency(&note.text);
        info!(
            "event=note_stats module=service status=ok note_id={id} text_chars={} unique_words={}",
            note.text.chars().count(),
            stats.len()
        );
        Ok(stats)
    }

    fn require_note(&self, id: NoteId, event: &'static str) -> ServiceResult<Note> {
        match self.store.find_by_id(id)? {
            Some(note) => Ok(note),
            None => {
                warn!("event={event} module=service status=not_found note_id={id}");
                Err(NoteServiceError::NotFound(id))
            }
        }
    }

    fn normalize_page_size(&self, size: u32) -> u32 {
        if size == 0 {
            self.config.default_page_size
        } else {
            size
        }
    }
}

fn display_id(note: &Note) -> String {
    note.id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unassigned".to_string())
}

fn format_tags(tags: &BTreeSet<NoteTag>) -> String {
    tags.iter()
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join("|")
}
