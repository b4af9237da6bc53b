// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full HTTP stack (router, auth, ingestion
//! pipeline) over a temp SQLite database and a [`RecordingInvalidator`],
//! and drives it in-process with `tower::ServiceExt::oneshot`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode};
use postline_config::model::StorageConfig;
use postline_core::{BlogStore, PostlineError};
use postline_gateway::{AppState, HealthState, WebhookAuth, build_router};
use postline_ingest::{IngestPipeline, IngestSettings};
use postline_storage::SqliteStore;
use serde_json::Value;
use tower::ServiceExt;

use crate::recording_invalidator::RecordingInvalidator;

/// Secret the harness configures unless overridden.
pub const DEFAULT_SECRET: &str = "test-secret-123";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    secret: String,
    site_base_url: String,
    expose_storage_errors: bool,
    failing_invalidator: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            site_base_url: "https://vincesportsmassage.com".to_string(),
            expose_storage_errors: false,
            failing_invalidator: false,
        }
    }

    /// Set the webhook secret the router expects.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Set the public base URL used for returned post URLs.
    pub fn with_site_base_url(mut self, url: impl Into<String>) -> Self {
        self.site_base_url = url.into();
        self
    }

    /// Return raw storage errors in 500 responses.
    pub fn with_exposed_storage_errors(mut self) -> Self {
        self.expose_storage_errors = true;
        self
    }

    /// Make every cache invalidation fail.
    pub fn with_failing_invalidator(mut self) -> Self {
        self.failing_invalidator = true;
        self
    }

    /// Build the harness, creating a temp database and the full router.
    pub async fn build(self) -> Result<TestHarness, PostlineError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| PostlineError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let store = Arc::new(SqliteStore::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        }));
        store.initialize().await?;

        let invalidator = Arc::new(if self.failing_invalidator {
            RecordingInvalidator::failing()
        } else {
            RecordingInvalidator::new()
        });

        let pipeline = IngestPipeline::new(
            store.clone(),
            invalidator.clone(),
            IngestSettings {
                site_base_url: self.site_base_url,
                default_author: "Vince McDowell".to_string(),
                workflow_name: "Blog Automation".to_string(),
            },
        );
        let state = AppState {
            pipeline: Arc::new(pipeline),
            store: store.clone(),
            expose_storage_errors: self.expose_storage_errors,
            health: HealthState::default(),
        };
        let router = build_router(state, WebhookAuth::new(self.secret.clone()));

        Ok(TestHarness {
            router,
            store,
            invalidator,
            secret: self.secret,
            database_path: db_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment over a temp SQLite database.
pub struct TestHarness {
    /// The full application router.
    pub router: Router,
    /// SQLite store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteStore>,
    /// Records every cache invalidation.
    pub invalidator: Arc<RecordingInvalidator>,
    secret: String,
    database_path: PathBuf,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The webhook secret the router accepts.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Path of the temp SQLite file behind [`TestHarness::store`].
    ///
    /// Tests open their own connection here to damage the schema and drive
    /// the storage failure paths.
    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// Send a request through the router and decode the JSON response body.
    ///
    /// A body that is not JSON decodes as `Value::Null`.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body readable");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// POST a raw body to `/api/blog` with the given secret header, if any.
    pub async fn post_blog(&self, secret: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/blog")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header("x-webhook-secret", secret);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// POST a JSON payload to `/api/blog` with the correct secret.
    pub async fn create_post(&self, payload: &Value) -> (StatusCode, Value) {
        self.post_blog(Some(&self.secret), &payload.to_string()).await
    }

    /// GET `uri` without credentials.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }
}
