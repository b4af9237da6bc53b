// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait for blog posts and the automation audit trail.

use async_trait::async_trait;

use crate::error::PostlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AutomationLogEntry, BlogPost, BlogPostSummary, NewAutomationLog, NewBlogPost, PostQuery};

/// Persistence backend for blog posts and automation logs.
///
/// Implementations must enforce slug uniqueness themselves and report a
/// collision at insert time as [`PostlineError::SlugTaken`].
#[async_trait]
pub trait BlogStore: PluginAdapter {
    /// Initializes the backend (migrations, connection). Must be idempotent.
    async fn initialize(&self) -> Result<(), PostlineError>;

    /// Returns true if a post with this slug already exists.
    async fn slug_exists(&self, slug: &str) -> Result<bool, PostlineError>;

    /// Inserts a post and returns the stored record with its assigned id.
    async fn insert_post(&self, post: &NewBlogPost) -> Result<BlogPost, PostlineError>;

    /// Lists posts, newest publication first.
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<BlogPostSummary>, PostlineError>;

    /// Appends an immutable automation log entry.
    async fn append_automation_log(
        &self,
        entry: &NewAutomationLog,
    ) -> Result<AutomationLogEntry, PostlineError>;
}
