// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles POST /api/blog, GET /api/blog, GET /health.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use postline_core::{BlogPostSummary, HealthStatus, PostQuery, PostStatus};
use postline_ingest::IngestedPost;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, GENERIC_LIST_FAILURE};
use crate::server::AppState;

/// Default page size for GET /api/blog.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size GET /api/blog will return.
pub const MAX_LIMIT: u32 = 100;

/// Response body for a successful POST /api/blog.
#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub success: bool,
    pub post: IngestedPost,
}

/// Query parameters for GET /api/blog. Kept as raw strings so bad numbers
/// fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListParams {
    /// Convert to a store query, clamping paging values.
    pub fn into_query(self) -> Result<PostQuery, ApiError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => Some(PostStatus::Published),
            Some("all") => None,
            Some(raw) => Some(
                raw.parse::<PostStatus>()
                    .map_err(|_| ApiError::bad_request(format!("Invalid status `{raw}`")))?,
            ),
        };
        let limit = self
            .limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map_or(DEFAULT_LIMIT, |v| v.clamp(1, i64::from(MAX_LIMIT)) as u32);
        let offset = self
            .offset
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map_or(0, |v| v.clamp(0, i64::from(u32::MAX)) as u32);
        Ok(PostQuery {
            status,
            limit,
            offset,
        })
    }
}

/// Response body for GET /api/blog.
#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Vec<BlogPostSummary>,
    pub count: usize,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", "degraded", or "unhealthy".
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
}

/// POST /api/blog
///
/// Authentication has already passed in middleware. The body is parsed here
/// so a malformed body gets the JSON error shape rather than axum's default.
pub async fn create_post(State(state): State<AppState>, body: Bytes) -> Response {
    let raw: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting unparseable webhook body");
            return ApiError::invalid_json().into_response();
        }
    };

    match state.pipeline.ingest(&raw).await {
        Ok(post) => Json(CreatePostResponse {
            success: true,
            post,
        })
        .into_response(),
        Err(err) => ApiError::from_ingest(err, state.expose_storage_errors).into_response(),
    }
}

/// GET /api/blog
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let query = match params.into_query() {
        Ok(query) => query,
        Err(err) => return err.into_response(),
    };

    match state.store.list_posts(&query).await {
        Ok(posts) => Json(ListPostsResponse {
            count: posts.len(),
            posts,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to list blog posts");
            ApiError::storage(e.to_string(), GENERIC_LIST_FAILURE, state.expose_storage_errors)
                .into_response()
        }
    }
}

/// GET /health
///
/// Unauthenticated. Returns 503 when the store reports itself unhealthy.
pub async fn health(State(state): State<AppState>) -> Response {
    let (code, status) = match state.store.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "healthy"),
        Ok(HealthStatus::Degraded(reason)) => {
            tracing::warn!(reason = %reason, "store degraded");
            (StatusCode::OK, "degraded")
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            tracing::warn!(reason = %reason, "store unhealthy");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.health.start_time.elapsed().as_secs(),
        }),
    )
        .into_response()
}
