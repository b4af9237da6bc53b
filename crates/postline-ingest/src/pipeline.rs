// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion orchestrator.
//!
//! Runs one webhook body through validate, resolve slug, sanitize and
//! insert, audit, and invalidate, strictly in that order. Authentication and body parsing
//! happen in the gateway before a payload reaches [`IngestPipeline::ingest`].
//!
//! Every attempt that reaches slug resolution leaves exactly one
//! automation log entry. The success entry is best-effort; the failure
//! entry is attempted before the error is returned.

use std::sync::Arc;

use postline_config::PostlineConfig;
use postline_core::types::now_timestamp;
use postline_core::{BlogPost, BlogStore, CacheInvalidator, LogStatus, NewBlogPost, PostStatus};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::audit::AuditLogWriter;
use crate::error::IngestError;
use crate::excerpt::derive_excerpt;
use crate::invalidate::{notify_stale, stale_paths};
use crate::sanitize::sanitize_html;
use crate::slug::{SlugError, resolve_slug};
use crate::validate::{BlogPostPayload, FieldError, FieldErrorKind, validate_payload};

/// Site-level values the pipeline stamps onto every post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSettings {
    /// Public base URL used to build the returned post URL.
    pub site_base_url: String,
    /// Author for posts that do not name one.
    pub default_author: String,
    /// Workflow name written to the automation log.
    pub workflow_name: String,
}

impl IngestSettings {
    /// Derive settings from a validated configuration.
    pub fn from_config(config: &PostlineConfig) -> Self {
        Self {
            site_base_url: config.site.base_url.clone().unwrap_or_default(),
            default_author: config.site.owner_name.clone(),
            workflow_name: config.webhook.workflow_name.clone(),
        }
    }

    /// Public URL of the post with `slug`.
    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/blog/{slug}", self.site_base_url.trim_end_matches('/'))
    }
}

/// Summary of a successfully ingested post, returned to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub status: PostStatus,
    pub url: String,
}

/// Orchestrates a single ingestion attempt. Holds no per-request state.
pub struct IngestPipeline {
    store: Arc<dyn BlogStore>,
    invalidator: Arc<dyn CacheInvalidator>,
    audit: AuditLogWriter,
    settings: IngestSettings,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn BlogStore>,
        invalidator: Arc<dyn CacheInvalidator>,
        settings: IngestSettings,
    ) -> Self {
        let audit = AuditLogWriter::new(Arc::clone(&store), settings.workflow_name.clone());
        Self {
            store,
            invalidator,
            audit,
            settings,
        }
    }

    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    /// Ingest a parsed webhook body.
    pub async fn ingest(&self, raw: &Value) -> Result<IngestedPost, IngestError> {
        let payload = validate_payload(raw).map_err(IngestError::Validation)?;
        let execution_id = payload.execution_id.as_deref();
        let audit_payload = serde_json::to_value(&payload).unwrap_or_else(|_| raw.clone());

        let post = match self.persist(&payload).await {
            Ok(post) => post,
            Err(err @ IngestError::Validation(_)) => return Err(err),
            Err(err) => return Err(self.record_failure(execution_id, &audit_payload, err).await),
        };

        if let Err(e) = self
            .audit
            .record(
                execution_id,
                LogStatus::Success,
                &audit_payload,
                json!({"postId": post.id, "slug": post.slug}),
            )
            .await
        {
            warn!(error = %e, slug = %post.slug, "failed to record automation success");
        }

        notify_stale(self.invalidator.as_ref(), &stale_paths(&post.slug)).await;

        info!(
            post_id = %post.id,
            slug = %post.slug,
            status = %post.status,
            execution_id = execution_id.unwrap_or("-"),
            workflow = self.audit.workflow_name(),
            "blog post ingested"
        );

        Ok(IngestedPost {
            url: self.settings.post_url(&post.slug),
            id: post.id,
            slug: post.slug,
            title: post.title,
            status: post.status,
        })
    }

    /// Resolve a slug and insert, re-resolving once on a late slug collision.
    async fn persist(&self, payload: &BlogPostPayload) -> Result<BlogPost, IngestError> {
        let slug = self.resolve(payload).await?;
        match self.store.insert_post(&self.build_post(payload, slug)).await {
            Ok(post) => Ok(post),
            Err(e) if e.is_slug_taken() => {
                warn!(error = %e, "slug taken between check and insert, re-resolving");
                let slug = self.resolve(payload).await?;
                self.store
                    .insert_post(&self.build_post(payload, slug))
                    .await
                    .map_err(|e| IngestError::Persistence {
                        message: e.to_string(),
                    })
            }
            Err(e) => Err(IngestError::Persistence {
                message: e.to_string(),
            }),
        }
    }

    async fn resolve(&self, payload: &BlogPostPayload) -> Result<String, IngestError> {
        resolve_slug(payload.slug.as_deref(), &payload.title, self.store.as_ref())
            .await
            .map_err(|e| match e {
                SlugError::Empty => IngestError::Validation(vec![FieldError {
                    field: "title".to_string(),
                    kind: FieldErrorKind::TooSmall,
                    message: "Title must contain at least one letter or digit".to_string(),
                }]),
                SlugError::Conflict { candidate } => IngestError::SlugConflict { candidate },
                SlugError::Store(e) => IngestError::Persistence {
                    message: e.to_string(),
                },
            })
    }

    fn build_post(&self, payload: &BlogPostPayload, slug: String) -> NewBlogPost {
        let publish = payload.publish.unwrap_or(false);
        let content = sanitize_html(&payload.content);
        NewBlogPost {
            slug,
            title: payload.title.clone(),
            excerpt: Some(
                payload
                    .excerpt
                    .clone()
                    .unwrap_or_else(|| derive_excerpt(&content)),
            ),
            content,
            featured_image: payload.image_url.clone(),
            meta_description: payload.meta_description.clone(),
            meta_keywords: payload.keywords.clone().unwrap_or_default(),
            author: payload
                .author
                .clone()
                .unwrap_or_else(|| self.settings.default_author.clone()),
            status: if publish {
                PostStatus::Published
            } else {
                PostStatus::Draft
            },
            published_at: publish.then(now_timestamp),
            execution_id: payload.execution_id.clone(),
            auto_generated: true,
        }
    }

    /// Write the failure audit entry and hand back the original error.
    async fn record_failure(
        &self,
        execution_id: Option<&str>,
        audit_payload: &Value,
        err: IngestError,
    ) -> IngestError {
        error!(error = %err, execution_id = execution_id.unwrap_or("-"), "blog post ingestion failed");
        if let Err(e) = self
            .audit
            .record(
                execution_id,
                LogStatus::Error,
                audit_payload,
                json!({"error": err.to_string()}),
            )
            .await
        {
            error!(error = %e, "failed to record automation failure");
        }
        err
    }
}
