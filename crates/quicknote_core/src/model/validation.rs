//! Field-level validation for note title/text.
//!
//! Violations are collected into one report instead of failing on the first
//! bad field, so callers can show every problem at once.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum title length, counted in characters.
pub const TITLE_MAX_CHARS: usize = 255;
/// Maximum text length, counted in characters.
pub const TEXT_MAX_CHARS: usize = 10_000;

/// Structured report of field violations keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation. The first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed:")?;
        for (idx, (field, message)) in self.fields.iter().enumerate() {
            let sep = if idx == 0 { " " } else { "; " };
            write!(f, "{sep}{field}: {message}")?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Validates the supplied note fields. `None` fields are skipped.
pub fn validate_note_fields(title: Option<&str>, text: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Some(title) = title {
        check_field(&mut errors, "title", "Title", title, TITLE_MAX_CHARS);
    }
    if let Some(text) = text {
        check_field(&mut errors, "text", "Text", text, TEXT_MAX_CHARS);
    }
    errors
}

fn check_field(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
    max_chars: usize,
) {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is mandatory"));
    } else if value.chars().count() > max_chars {
        errors.add(
            field,
            format!("{label} must be at most {max_chars} characters"),
        );
    }
}
