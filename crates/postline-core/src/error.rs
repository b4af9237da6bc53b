// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Postline.

use thiserror::Error;

/// The primary error type used across all Postline adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PostlineError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An insert collided with the unique index on `blog_posts.slug`.
    ///
    /// Distinct from [`PostlineError::Storage`] so callers can re-resolve the
    /// slug and retry instead of failing outright.
    #[error("slug `{slug}` is already taken")]
    SlugTaken { slug: String },

    /// Cache invalidation errors (revalidation endpoint unreachable or rejecting).
    #[error("cache invalidation error: {message}")]
    Invalidation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PostlineError {
    /// Returns true if this error is a slug uniqueness violation.
    pub fn is_slug_taken(&self) -> bool {
        matches!(self, PostlineError::SlugTaken { .. })
    }
}
