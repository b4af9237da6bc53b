// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from request failures to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use postline_ingest::{FieldError, IngestError};
use serde::Serialize;

/// Generic message returned for store failures unless raw messages are exposed.
pub const GENERIC_CREATE_FAILURE: &str = "Failed to create blog post";

/// Generic message returned when listing fails.
pub const GENERIC_LIST_FAILURE: &str = "Failed to fetch blog posts";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

/// An error response: status code plus `{error, details?}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: Vec::new(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// An unparseable body. The caller only learns that the request failed.
    pub fn invalid_json() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Internal server error")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn validation(details: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: "Validation failed".to_string(),
                details,
            },
        }
    }

    /// A store failure. The raw message is only returned when `expose` is set.
    pub fn storage(raw: impl Into<String>, generic: &str, expose: bool) -> Self {
        let message = if expose { raw.into() } else { generic.to_string() };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// Map an ingestion failure, applying the storage error exposure policy.
    pub fn from_ingest(err: IngestError, expose_storage_errors: bool) -> Self {
        match err {
            IngestError::Validation(details) => Self::validation(details),
            err @ IngestError::SlugConflict { .. } => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            IngestError::Persistence { message } => {
                Self::storage(message, GENERIC_CREATE_FAILURE, expose_storage_errors)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
