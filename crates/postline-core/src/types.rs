// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the storage, ingestion, and gateway crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Lifecycle state of a blog post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Scheduled,
}

/// Outcome recorded on an automation log entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Error,
    Pending,
}

/// A blog post as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Store-generated identifier (UUID v4).
    pub id: String,
    /// URL-safe identifier, unique across all posts.
    pub slug: String,
    pub title: String,
    /// Body, may contain HTML.
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Vec<String>,
    pub author: String,
    pub status: PostStatus,
    /// ISO 8601 timestamp, set iff `status` is `Published`.
    pub published_at: Option<String>,
    /// Correlation id of the automation run that produced the post.
    pub execution_id: Option<String>,
    pub auto_generated: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A blog post ready to be inserted. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBlogPost {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Vec<String>,
    pub author: String,
    pub status: PostStatus,
    pub published_at: Option<String>,
    pub execution_id: Option<String>,
    pub auto_generated: bool,
}

/// Listing projection of a blog post returned by `GET /api/blog`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPostSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: String,
    pub published_at: Option<String>,
    pub status: PostStatus,
}

impl From<&BlogPost> for BlogPostSummary {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.clone(),
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            featured_image: post.featured_image.clone(),
            author: post.author.clone(),
            published_at: post.published_at.clone(),
            status: post.status,
        }
    }
}

/// Filter and paging for post listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// `None` lists every status.
    pub status: Option<PostStatus>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            status: Some(PostStatus::Published),
            limit: 10,
            offset: 0,
        }
    }
}

/// An automation log entry ready to be appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAutomationLog {
    pub workflow_name: String,
    pub execution_id: Option<String>,
    pub status: LogStatus,
    /// The validated input, kept for forensic replay.
    pub payload: serde_json::Value,
    /// `{postId, slug}` on success, `{error}` on failure.
    pub result: serde_json::Value,
}

/// An immutable audit record of one ingestion attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationLogEntry {
    pub id: i64,
    pub workflow_name: String,
    pub execution_id: Option<String>,
    pub status: LogStatus,
    pub payload: serde_json::Value,
    pub result: serde_json::Value,
    pub created_at: String,
}

/// Current UTC time in the ISO 8601 form every Postline timestamp uses.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
