// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use postline_core::{BlogStore, PostlineError};
use postline_ingest::IngestPipeline;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{WebhookAuth, webhook_auth};
use crate::error::ApiError;
use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ingestion orchestrator for the webhook route.
    pub pipeline: Arc<IngestPipeline>,
    /// Store used for listing and health checks.
    pub store: Arc<dyn BlogStore>,
    /// Return raw storage error messages to callers.
    pub expose_storage_errors: bool,
    pub health: HealthState,
}

/// Listener address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Last-resort handler for panics inside a request.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "request handler panicked");
    ApiError::internal().into_response()
}

/// Build the application router.
///
/// Only `POST /api/blog` sits behind the webhook secret; the listing and
/// health routes are public.
pub fn build_router(state: AppState, auth: WebhookAuth) -> Router {
    Router::new()
        .route(
            "/api/blog",
            post(handlers::create_post)
                .route_layer(axum_middleware::from_fn_with_state(auth, webhook_auth))
                .get(handlers::list_posts),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Bind and serve `app` until `shutdown` resolves.
pub async fn start_server<F>(config: &ServerConfig, app: Router, shutdown: F) -> Result<(), PostlineError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PostlineError::Server {
            message: format!("failed to bind to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Postline listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PostlineError::Server {
            message: format!("server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use http::{Request, StatusCode};
    use postline_core::{LogStatus, PostStatus};
    use postline_ingest::IngestSettings;
    use postline_test_utils::{MemoryStore, RecordingInvalidator};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    const SECRET: &str = "test-secret-123";

    struct Fixture {
        store: Arc<MemoryStore>,
        invalidator: Arc<RecordingInvalidator>,
        router: Router,
    }

    fn fixture(expose_storage_errors: bool) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let invalidator = Arc::new(RecordingInvalidator::new());
        let pipeline = IngestPipeline::new(
            store.clone(),
            invalidator.clone(),
            IngestSettings {
                site_base_url: "https://vincesportsmassage.com".to_string(),
                default_author: "Vince McDowell".to_string(),
                workflow_name: "Blog Automation".to_string(),
            },
        );
        let state = AppState {
            pipeline: Arc::new(pipeline),
            store: store.clone(),
            expose_storage_errors,
            health: HealthState::default(),
        };
        Fixture {
            router: build_router(state, WebhookAuth::new(SECRET)),
            store,
            invalidator,
        }
    }

    fn post_blog(secret: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/blog")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header("x-webhook-secret", secret);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn valid_webhook_creates_post() {
        let f = fixture(false);
        let (status, body) = send(
            f.router,
            post_blog(
                Some(SECRET),
                r#"{"title":"Test Post","content":"This is test content"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["post"]["slug"], "test-post");
        assert_eq!(body["post"]["title"], "Test Post");
        assert_eq!(body["post"]["status"], "draft");
        assert_eq!(
            body["post"]["url"],
            "https://vincesportsmassage.com/blog/test-post"
        );
        assert!(body["post"]["id"].is_string());

        let audits = f.store.audit_entries();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].status, LogStatus::Success);
        assert_eq!(f.invalidator.calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_secret_is_unauthorized_and_writes_nothing() {
        let f = fixture(false);
        let (status, body) = send(
            f.router,
            post_blog(None, r#"{"title":"T","content":"C"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Unauthorized"}));
        assert_eq!(f.store.insert_calls(), 0);
        assert!(f.store.audit_entries().is_empty());
    }

    #[tokio::test]
    async fn wrong_secret_is_unauthorized() {
        let f = fixture(false);
        let (status, _) = send(
            f.router,
            post_blog(Some("test-secret-124"), r#"{"title":"T","content":"C"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(f.store.insert_calls(), 0);
        assert!(f.store.audit_entries().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_without_audit() {
        let f = fixture(false);
        let (status, body) = send(f.router, post_blog(Some(SECRET), "{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Internal server error"}));
        assert!(f.store.audit_entries().is_empty());
    }

    #[tokio::test]
    async fn validation_failure_lists_field_details() {
        let f = fixture(false);
        let (status, body) = send(
            f.router,
            post_blog(Some(SECRET), r#"{"title":"","keywords":["a",1]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["title", "content", "keywords.1"]);
        assert!(f.store.audit_entries().is_empty());
    }

    #[tokio::test]
    async fn slug_conflict_returns_409() {
        let f = fixture(false);
        f.store.treat_all_slugs_as_taken(true);
        let (status, body) = send(
            f.router,
            post_blog(Some(SECRET), r#"{"title":"Test Post","content":"C"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("test-post"));
        assert_eq!(f.store.audit_entries()[0].status, LogStatus::Error);
    }

    #[tokio::test]
    async fn storage_failure_hides_raw_message_by_default() {
        let f = fixture(false);
        f.store.fail_inserts(true);
        let (status, body) = send(
            f.router,
            post_blog(Some(SECRET), r#"{"title":"Test Post","content":"C"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to create blog post"}));
        let audits = f.store.audit_entries();
        assert_eq!(audits.len(), 1);
        assert!(audits[0].result["error"].as_str().unwrap().contains("injected"));
    }

    #[tokio::test]
    async fn storage_failure_message_exposed_when_configured() {
        let f = fixture(true);
        f.store.fail_inserts(true);
        let (status, body) = send(
            f.router,
            post_blog(Some(SECRET), r#"{"title":"Test Post","content":"C"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("injected"));
    }

    #[tokio::test]
    async fn listing_is_public_and_filters_published() {
        let f = fixture(false);
        for (title, publish) in [("Live", true), ("Hidden", false)] {
            let body = json!({"title": title, "content": "c", "publish": publish}).to_string();
            let (status, _) = send(f.router.clone(), post_blog(Some(SECRET), &body)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(f.router.clone(), get_request("/api/blog")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["posts"][0]["slug"], "live");
        assert_eq!(body["posts"][0]["status"], PostStatus::Published.to_string());
        assert!(body["posts"][0].get("content").is_none());

        let (_, body) = send(f.router, get_request("/api/blog?status=all&limit=1")).await;
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn listing_rejects_unknown_status() {
        let f = fixture(false);
        let (status, body) = send(f.router, get_request("/api/blog?status=archived")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("archived"));
    }

    #[tokio::test]
    async fn listing_failure_returns_500() {
        let f = fixture(false);
        f.store.fail_lists(true);
        let (status, body) = send(f.router, get_request("/api/blog")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to fetch blog posts"}));
    }

    #[tokio::test]
    async fn health_reports_store_status() {
        let f = fixture(false);
        let (status, body) = send(f.router.clone(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["version"].is_string());

        f.store.set_health(postline_core::HealthStatus::Unhealthy("down".into()));
        let (status, body) = send(f.router, get_request("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
    }

    #[tokio::test]
    async fn panics_become_internal_server_error() {
        async fn boom() -> &'static str {
            panic!("handler exploded")
        }
        let router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let (status, body) = send(router, get_request("/boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn get_does_not_require_secret_but_post_does() {
        let f = fixture(false);
        let (status, _) = send(f.router.clone(), get_request("/api/blog")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(f.router, post_blog(None, "{}")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
