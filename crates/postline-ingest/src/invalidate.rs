// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache invalidation for the public site.
//!
//! After a post is stored, the renderer's cached `/blog` listing and the
//! post's own page are stale. [`HttpRevalidator`] asks the renderer to
//! rebuild them; [`NoopInvalidator`] stands in when no endpoint is
//! configured. Either way [`notify_stale`] never lets a failure escape.

use std::time::Duration;

use async_trait::async_trait;
use postline_config::model::RevalidateConfig;
use postline_core::{CacheInvalidator, PostlineError};
use serde::Serialize;
use tracing::{debug, warn};

/// Paths made stale by publishing `slug`.
pub fn stale_paths(slug: &str) -> Vec<String> {
    vec!["/blog".to_string(), format!("/blog/{slug}")]
}

#[derive(Serialize)]
struct RevalidateRequest<'a> {
    paths: &'a [String],
}

/// Calls the renderer's on-demand revalidation endpoint.
///
/// Sends `POST {"paths": [...]}` with an optional bearer token. Any
/// non-2xx status is an error.
#[derive(Debug, Clone)]
pub struct HttpRevalidator {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpRevalidator {
    pub fn new(
        url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PostlineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PostlineError::Invalidation {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }

    /// Build from config. Returns `None` when no revalidation URL is set.
    pub fn from_config(config: &RevalidateConfig) -> Result<Option<Self>, PostlineError> {
        let Some(url) = config.url.as_deref() else {
            return Ok(None);
        };
        Self::new(
            url,
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }
}

#[async_trait]
impl CacheInvalidator for HttpRevalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<(), PostlineError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&RevalidateRequest { paths });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PostlineError::Invalidation {
                message: format!("revalidation request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PostlineError::Invalidation {
                message: format!("revalidation endpoint returned {status}: {body}"),
                source: None,
            });
        }
        debug!(?paths, "revalidation accepted");
        Ok(())
    }
}

/// Invalidator used when no revalidation endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

#[async_trait]
impl CacheInvalidator for NoopInvalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<(), PostlineError> {
        debug!(?paths, "no revalidation endpoint configured, skipping");
        Ok(())
    }
}

/// Invalidate `paths`, logging and swallowing any failure.
pub async fn notify_stale(invalidator: &dyn CacheInvalidator, paths: &[String]) {
    if let Err(e) = invalidator.invalidate(paths).await {
        warn!(error = %e, ?paths, "cache invalidation failed");
    }
}
