// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blog post ingestion for Postline.
//!
//! Turns a raw webhook body into a stored, audited, announced blog post:
//! payload validation with dual naming conventions, HTML sanitization,
//! slug resolution, excerpt derivation, the automation audit trail, and best-effort cache
//! invalidation, orchestrated by [`IngestPipeline`].

pub mod audit;
pub mod error;
pub mod excerpt;
pub mod invalidate;
pub mod pipeline;
pub mod sanitize;
pub mod slug;
pub mod validate;

pub use audit::AuditLogWriter;
pub use error::IngestError;
pub use excerpt::derive_excerpt;
pub use invalidate::{HttpRevalidator, NoopInvalidator, notify_stale, stale_paths};
pub use pipeline::{IngestPipeline, IngestSettings, IngestedPost};
pub use sanitize::sanitize_html;
pub use slug::{SlugError, generate_slug, resolve_slug};
pub use validate::{BlogPostPayload, FieldError, FieldErrorKind, validate_payload};
