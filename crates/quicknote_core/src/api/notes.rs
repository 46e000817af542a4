//! Transport-neutral notes boundary.
//!
//! # Responsibility
//! - Accept wire-level inputs (string ids, raw tag names, request bodies).
//! - Validate create/full-update bodies before the service is called.
//! - Project service results into response DTOs and failures into
//!   [`ErrorResponse`] envelopes.
//!
//! # Invariants
//! - Ids that do not parse as UUID are reported as not found; no note can
//!   carry them.
//! - Every error path goes through `ErrorResponse`.

use crate::analytics::word_frequency::WordFrequency;
use crate::api::dto::{NoteFullResponse, NoteRequest, NoteShortResponse, PageResponse};
use crate::api::error::ErrorResponse;
use crate::model::note::{NoteId, NoteTag};
use crate::model::validation::ValidationErrors;
use crate::repo::note_repo::NoteStore;
use crate::service::note_service::NoteService;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Base path of the notes resource.
pub const NOTES_PATH: &str = "/api/notes";

pub type ApiResult<T> = Result<T, ErrorResponse>;

/// Boundary facade over [`NoteService`].
pub struct NotesApi<S: NoteStore> {
    service: NoteService<S>,
}

impl<S: NoteStore> NotesApi<S> {
    pub fn new(service: NoteService<S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &NoteService<S> {
        &self.service
    }

    /// `POST /api/notes`
    pub fn create(&self, request: NoteRequest) -> ApiResult<NoteFullResponse> {
        let draft = request
            .into_draft()
            .map_err(|errors| ErrorResponse::validation(errors, NOTES_PATH))?;
        self.service
            .create_note(draft)
            .map(NoteFullResponse::from)
            .map_err(|err| ErrorResponse::from_service_error(err, NOTES_PATH))
    }

    /// `GET /api/notes?tags=..&page=..&size=..`
    ///
    /// `page` defaults to 0 and `size` to 10 when omitted.
    pub fn list(
        &self,
        tags: &[&str],
        page: Option<u32>,
        size: Option<u32>,
    ) -> ApiResult<PageResponse<NoteShortResponse>> {
        let tags = parse_tag_filter(tags)?;
        let size = size.unwrap_or(self.service.config().default_page_size);
        self.service
            .list_notes(Some(&tags), page.unwrap_or(0), size)
            .map(|result| PageResponse::from(result.map(NoteShortResponse::from)))
            .map_err(|err| ErrorResponse::from_service_error(err, NOTES_PATH))
    }

    /// `GET /api/notes/{id}`
    pub fn get(&self, id: &str) -> ApiResult<NoteFullResponse> {
        let path = note_path(id);
        let note_id = parse_note_id(id, &path)?;
        self.service
            .get_note(note_id)
            .map(NoteFullResponse::from)
            .map_err(|err| ErrorResponse::from_service_error(err, &path))
    }

    /// `PUT /api/notes/{id}`
    pub fn update(&self, id: &str, request: NoteRequest) -> ApiResult<NoteFullResponse> {
        let path = note_path(id);
        let draft = request
            .into_draft()
            .map_err(|errors| ErrorResponse::validation(errors, &path))?;
        let note_id = parse_note_id(id, &path)?;
        self.service
            .update_note(note_id, draft)
            .map(NoteFullResponse::from)
            .map_err(|err| ErrorResponse::from_service_error(err, &path))
    }

    /// `PATCH /api/notes/{id}`
    pub fn patch(&self, id: &str, request: NoteRequest) -> ApiResult<NoteFullResponse> {
        let path = note_path(id);
        let note_id = parse_note_id(id, &path)?;
        self.service
            .patch_note(note_id, request.into_patch())
            .map(NoteFullResponse::from)
            .map_err(|err| ErrorResponse::from_service_error(err, &path))
    }

    /// `DELETE /api/notes/{id}`; succeeds for unknown and malformed ids alike.
    pub fn delete(&self, id: &str) -> ApiResult<()> {
        let path = note_path(id);
        let Ok(note_id) = Uuid::parse_str(id.trim()) else {
            return Ok(());
        };
        self.service
            .delete_note(note_id)
            .map_err(|err| ErrorResponse::from_service_error(err, &path))
    }

    /// `GET /api/notes/{id}/stats`
    pub fn stats(&self, id: &str) -> ApiResult<WordFrequency> {
        let path = format!("{}/stats", note_path(id));
        let note_id = parse_note_id(id, &path)?;
        self.service
            .word_frequency(note_id)
            .map_err(|err| ErrorResponse::from_service_error(err, &path))
    }
}

/// Parses raw tag names from a query string; unknown names are a validation error.
pub fn parse_tag_filter(raw: &[&str]) -> ApiResult<BTreeSet<NoteTag>> {
    let mut tags = BTreeSet::new();
    let mut unknown = Vec::new();
    for value in raw
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        match NoteTag::parse(value) {
            Some(tag) => {
                tags.insert(tag);
            }
            None => unknown.push(value),
        }
    }

    if unknown.is_empty() {
        return Ok(tags);
    }

    let mut errors = ValidationErrors::new();
    errors.add(
        "tags",
        format!(
            "unknown tag(s) `{}`; expected BUSINESS|PERSONAL|IMPORTANT",
            unknown.join(", ")
        ),
    );
    Err(ErrorResponse::validation(errors, NOTES_PATH))
}

fn note_path(id: &str) -> String {
    format!("{NOTES_PATH}/{id}")
}

fn parse_note_id(id: &str, path: &str) -> ApiResult<NoteId> {
    Uuid::parse_str(id.trim())
        .map_err(|_| ErrorResponse::not_found(format!("note not found with id: {id}"), path))
}
