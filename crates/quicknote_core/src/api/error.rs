//! Centralized translation of service failures into boundary error envelopes.
//!
//! This is the only place that maps error kinds to status codes. Unexpected
//! failures are logged with detail here and reported without it.

use crate::model::note::now_epoch_ms;
use crate::model::validation::ValidationErrors;
use crate::service::note_service::NoteServiceError;
use log::{error, warn};
use serde::Serialize;
use std::collections::BTreeMap;

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

/// Error envelope returned to boundary callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    fn build(status: u16, error: &str, message: impl Into<String>, path: &str) -> Self {
        Self {
            timestamp: now_epoch_ms(),
            status,
            error: error.to_string(),
            message: message.into(),
            path: path.to_string(),
            validation_errors: None,
        }
    }

    pub fn not_found(message: impl Into<String>, path: &str) -> Self {
        let message = message.into();
        warn!("event=api_error module=api status=not_found path={path} message={message}");
        Self::build(STATUS_NOT_FOUND, "Not Found", message, path)
    }

    pub fn validation(errors: ValidationErrors, path: &str) -> Self {
        warn!(
            "event=api_error module=api status=validation path={path} fields={}",
            errors.len()
        );
        let mut response = Self::build(
            STATUS_BAD_REQUEST,
            "Validation Error",
            "One or more fields are invalid",
            path,
        );
        response.validation_errors = Some(errors.into_fields());
        response
    }

    /// Generic failure; `detail` goes to the log only.
    pub fn internal(detail: &dyn std::fmt::Display, path: &str) -> Self {
        error!("event=api_error module=api status=error path={path} error={detail}");
        Self::build(
            STATUS_INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "An unexpected error occurred",
            path,
        )
    }

    /// Maps a service failure onto its envelope.
    pub fn from_service_error(err: NoteServiceError, path: &str) -> Self {
        match err {
            NoteServiceError::NotFound(_) => Self::not_found(err.to_string(), path),
            NoteServiceError::Validation(errors) => Self::validation(errors, path),
            NoteServiceError::Store(store_err) => Self::internal(&store_err, path),
        }
    }
}
