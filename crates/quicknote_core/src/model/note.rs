//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its fixed tag vocabulary.
//! - Provide the explicit field-by-field merge used by partial updates.
//!
//! # Invariants
//! - `id` is assigned once by the store and never changes afterwards.
//! - `created_at` is stamped once at construction and never touched by edits.
//! - `title`/`text` must pass [`validate_note_fields`] before first persistence.

use crate::model::validation::{validate_note_fields, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a persisted note.
pub type NoteId = Uuid;

/// Fixed category vocabulary for note tags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteTag {
    Business,
    Personal,
    Important,
}

impl NoteTag {
    /// Every tag in the vocabulary, in declaration order.
    pub const ALL: [NoteTag; 3] = [NoteTag::Business, NoteTag::Personal, NoteTag::Important];

    /// Wire/storage name of this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Business => "BUSINESS",
            Self::Personal => "PERSONAL",
            Self::Important => "IMPORTANT",
        }
    }

    /// Parses a tag name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl Display for NoteTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not part of the tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTagError(pub String);

impl Display for UnknownTagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown tag `{}`; expected one of BUSINESS|PERSONAL|IMPORTANT",
            self.0
        )
    }
}

impl std::error::Error for UnknownTagError {}

impl FromStr for NoteTag {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownTagError(s.to_string()))
    }
}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Assigned by the store on first save; `None` only for unsaved drafts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    pub title: String,
    /// Body text; input of word-frequency analysis.
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub tags: BTreeSet<NoteTag>,
}

impl Note {
    /// Creates an unsaved note stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        tags: impl IntoIterator<Item = NoteTag>,
    ) -> Self {
        Self::with_created_at(title, text, tags, now_epoch_ms())
    }

    /// Creates an unsaved note with a caller-provided creation timestamp.
    ///
    /// Used by import paths and tests that need deterministic ordering.
    pub fn with_created_at(
        title: impl Into<String>,
        text: impl Into<String>,
        tags: impl IntoIterator<Item = NoteTag>,
        created_at: i64,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            text: text.into(),
            created_at,
            tags: tags.into_iter().collect(),
        }
    }

    /// Checks title/text against the persisted-note invariants.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_note_fields(Some(&self.title), Some(&self.text)).into_result()
    }

    /// Returns whether this note carries at least one of `tags`.
    pub fn has_any_tag(&self, tags: &BTreeSet<NoteTag>) -> bool {
        !self.tags.is_disjoint(tags)
    }
}

/// Complete desired state for create and full-update use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub tags: BTreeSet<NoteTag>,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        tags: impl IntoIterator<Item = NoteTag>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            tags: tags.into_iter().collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_note_fields(Some(&self.title), Some(&self.text)).into_result()
    }

    /// Overwrites every mutable field of `note` with this draft.
    ///
    /// `id` and `created_at` are left untouched.
    pub fn apply_to(self, note: &mut Note) {
        note.title = self.title;
        note.text = self.text;
        note.tags = self.tags;
    }
}

/// Partial update request. `None` means "leave the field as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub tags: Option<BTreeSet<NoteTag>>,
}

impl NotePatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = NoteTag>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Returns `true` when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none() && self.tags.is_none()
    }

    /// Validates only the fields present in the patch.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_note_fields(self.title.as_deref(), self.text.as_deref()).into_result()
    }

    /// Merges present fields into `note`; absent fields keep their value.
    ///
    /// No validation happens here; callers decide whether to run
    /// [`NotePatch::validate`] first.
    pub fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(text) = self.text {
            note.text = text;
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
    }
}

/// Current wall clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
