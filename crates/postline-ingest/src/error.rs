// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure taxonomy of a single ingestion attempt.

use thiserror::Error;

use crate::validate::FieldError;

/// Why an ingestion attempt did not produce a post.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload failed validation. Nothing was written.
    #[error("validation failed ({} field error(s))", .0.len())]
    Validation(Vec<FieldError>),

    /// Every suffixed slug candidate was already taken. Audited.
    #[error("could not find a free slug for `{candidate}`")]
    SlugConflict { candidate: String },

    /// The store failed while resolving or inserting. Audited with `message`.
    #[error("{message}")]
    Persistence { message: String },
}

impl IngestError {
    /// Field errors for a validation failure, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            IngestError::Validation(errors) => errors,
            _ => &[],
        }
    }
}
