// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Postline.
//!
//! Routes:
//! - `POST /api/blog`: automation webhook, guarded by `x-webhook-secret`
//! - `GET /api/blog`: public listing of posts
//! - `GET /health`: liveness probe
//!
//! The gateway owns authentication, body parsing, and the mapping from
//! ingestion failures to HTTP responses. Everything else is delegated to
//! [`postline_ingest::IngestPipeline`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{WEBHOOK_SECRET_HEADER, WebhookAuth};
pub use error::ApiError;
pub use server::{AppState, HealthState, ServerConfig, build_router, start_server};
