//! Request/response shapes for the notes boundary.
//!
//! Field names follow the camelCase wire format of the REST surface.

use crate::model::note::{Note, NoteDraft, NotePatch, NoteTag};
use crate::model::page::Page;
use crate::model::validation::{validate_note_fields, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inbound note body shared by create, full update and partial update.
///
/// Create/full update require `title` and `text`; partial update treats every
/// field as optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Option<BTreeSet<NoteTag>>,
}

impl NoteRequest {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            text: Some(text.into()),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = NoteTag>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Converts into a complete draft, reporting every missing or invalid field.
    pub fn into_draft(self) -> Result<NoteDraft, ValidationErrors> {
        let title = self.title.unwrap_or_default();
        let text = self.text.unwrap_or_default();
        validate_note_fields(Some(&title), Some(&text)).into_result()?;
        Ok(NoteDraft {
            title,
            text,
            tags: self.tags.unwrap_or_default(),
        })
    }

    /// Converts into a patch without validating anything.
    pub fn into_patch(self) -> NotePatch {
        NotePatch {
            title: self.title,
            text: self.text,
            tags: self.tags,
        }
    }
}

/// Full note view returned by single-note operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFullResponse {
    pub id: String,
    pub title: String,
    pub text: String,
    pub created_date: i64,
    pub tags: BTreeSet<NoteTag>,
}

impl From<Note> for NoteFullResponse {
    fn from(note: Note) -> Self {
        Self {
            id: id_string(&note),
            title: note.title,
            text: note.text,
            created_date: note.created_at,
            tags: note.tags,
        }
    }
}

/// Abbreviated list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteShortResponse {
    pub id: String,
    pub title: String,
    pub created_date: i64,
}

impl From<Note> for NoteShortResponse {
    fn from(note: Note) -> Self {
        Self {
            id: id_string(&note),
            title: note.title,
            created_date: note.created_at,
        }
    }
}

/// Page envelope on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last: bool,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        let number_of_elements = page.number_of_elements();
        let total_pages = page.total_pages();
        let last = page.is_last();
        Self {
            content: page.content,
            number: page.number,
            size: page.size,
            number_of_elements,
            total_elements: page.total_elements,
            total_pages,
            last,
        }
    }
}

fn id_string(note: &Note) -> String {
    note.id.map(|id| id.to_string()).unwrap_or_default()
}
