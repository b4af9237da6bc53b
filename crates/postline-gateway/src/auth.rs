// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret authentication for the automation webhook.
//!
//! The caller proves itself with the `x-webhook-secret` header. A missing,
//! non-ASCII, or mismatching header is rejected with 401 before the body
//! is read. Rejections are never audited.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use postline_security::verify_webhook_secret;

use crate::error::ApiError;

/// Header carrying the webhook shared secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Authentication configuration for the webhook route.
#[derive(Clone)]
pub struct WebhookAuth {
    secret: Arc<str>,
}

impl WebhookAuth {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for WebhookAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookAuth")
            .field("secret", &"[redacted]")
            .finish()
    }
}

/// Middleware that admits a request only if its webhook secret matches.
pub async fn webhook_auth(
    State(auth): State<WebhookAuth>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|received| verify_webhook_secret(received, &auth.secret));

    if authorized {
        return next.run(request).await;
    }

    tracing::error!(
        method = %request.method(),
        path = %request.uri().path(),
        "invalid webhook secret"
    );
    ApiError::unauthorized().into_response()
}
