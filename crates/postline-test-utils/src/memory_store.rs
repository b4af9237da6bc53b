// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory blog store for deterministic testing.
//!
//! `MemoryStore` implements `BlogStore` over plain vectors and exposes
//! switches that make individual operations fail, so tests can drive every
//! error path of the ingestion pipeline without a database.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use postline_core::types::now_timestamp;
use postline_core::{
    AutomationLogEntry, BlogPost, BlogPostSummary, BlogStore, HealthStatus, NewAutomationLog,
    NewBlogPost, PluginAdapter, PostQuery, PostlineError,
};

fn injected(what: &str) -> PostlineError {
    PostlineError::Storage {
        source: format!("injected {what} failure").into(),
    }
}

/// A blog store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    posts: Mutex<Vec<BlogPost>>,
    audit: Mutex<Vec<AutomationLogEntry>>,
    seeded_slugs: Mutex<HashSet<String>>,
    health: Mutex<Option<HealthStatus>>,
    all_slugs_taken: AtomicBool,
    fail_slug_lookups: AtomicBool,
    fail_inserts: AtomicBool,
    fail_audit_writes: AtomicBool,
    fail_lists: AtomicBool,
    pending_slug_taken: AtomicUsize,
    slug_checks: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `slug` as taken without storing a post.
    pub fn seed_slug(&self, slug: &str) {
        self.seeded_slugs
            .lock()
            .expect("store lock poisoned")
            .insert(slug.to_string());
    }

    /// Report every slug as existing.
    pub fn treat_all_slugs_as_taken(&self, on: bool) {
        self.all_slugs_taken.store(on, Ordering::SeqCst);
    }

    pub fn fail_slug_lookups(&self, on: bool) {
        self.fail_slug_lookups.store(on, Ordering::SeqCst);
    }

    pub fn fail_inserts(&self, on: bool) {
        self.fail_inserts.store(on, Ordering::SeqCst);
    }

    pub fn fail_audit_writes(&self, on: bool) {
        self.fail_audit_writes.store(on, Ordering::SeqCst);
    }

    pub fn fail_lists(&self, on: bool) {
        self.fail_lists.store(on, Ordering::SeqCst);
    }

    /// Reject the next `count` inserts with `SlugTaken`, as if another writer
    /// claimed the slug between the existence check and the insert.
    pub fn reject_next_inserts_as_slug_taken(&self, count: usize) {
        self.pending_slug_taken.store(count, Ordering::SeqCst);
    }

    /// Override the status returned by `health_check`.
    pub fn set_health(&self, status: HealthStatus) {
        *self.health.lock().expect("store lock poisoned") = Some(status);
    }

    /// Stored posts in insertion order.
    pub fn posts(&self) -> Vec<BlogPost> {
        self.posts.lock().expect("store lock poisoned").clone()
    }

    /// Audit entries in append order.
    pub fn audit_entries(&self) -> Vec<AutomationLogEntry> {
        self.audit.lock().expect("store lock poisoned").clone()
    }

    /// Number of `slug_exists` calls made.
    pub fn slug_checks(&self) -> usize {
        self.slug_checks.load(Ordering::SeqCst)
    }

    /// Number of `insert_post` calls made, including failed ones.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    fn slug_in_use(&self, slug: &str) -> bool {
        self.all_slugs_taken.load(Ordering::SeqCst)
            || self
                .seeded_slugs
                .lock()
                .expect("store lock poisoned")
                .contains(slug)
            || self
                .posts
                .lock()
                .expect("store lock poisoned")
                .iter()
                .any(|p| p.slug == slug)
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> Result<HealthStatus, PostlineError> {
        Ok(self
            .health
            .lock()
            .expect("store lock poisoned")
            .clone()
            .unwrap_or(HealthStatus::Healthy))
    }

    async fn shutdown(&self) -> Result<(), PostlineError> {
        Ok(())
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn initialize(&self) -> Result<(), PostlineError> {
        Ok(())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, PostlineError> {
        self.slug_checks.fetch_add(1, Ordering::SeqCst);
        if self.fail_slug_lookups.load(Ordering::SeqCst) {
            return Err(injected("slug lookup"));
        }
        Ok(self.slug_in_use(slug))
    }

    async fn insert_post(&self, post: &NewBlogPost) -> Result<BlogPost, PostlineError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(injected("insert"));
        }
        let forced_collision = self
            .pending_slug_taken
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if forced_collision || self.slug_in_use(&post.slug) {
            return Err(PostlineError::SlugTaken {
                slug: post.slug.clone(),
            });
        }

        let now = now_timestamp();
        let stored = BlogPost {
            id: uuid::Uuid::new_v4().to_string(),
            slug: post.slug.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            featured_image: post.featured_image.clone(),
            meta_description: post.meta_description.clone(),
            meta_keywords: post.meta_keywords.clone(),
            author: post.author.clone(),
            status: post.status,
            published_at: post.published_at.clone(),
            execution_id: post.execution_id.clone(),
            auto_generated: post.auto_generated,
            created_at: now.clone(),
            updated_at: now,
        };
        self.posts
            .lock()
            .expect("store lock poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<BlogPostSummary>, PostlineError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(injected("list"));
        }
        let mut posts: Vec<BlogPost> = self
            .posts
            .lock()
            .expect("store lock poisoned")
            .iter()
            .filter(|p| query.status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        // Newest publication first, unpublished last, then newest creation.
        posts.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(posts
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(BlogPostSummary::from)
            .collect())
    }

    async fn append_automation_log(
        &self,
        entry: &NewAutomationLog,
    ) -> Result<AutomationLogEntry, PostlineError> {
        if self.fail_audit_writes.load(Ordering::SeqCst) {
            return Err(injected("audit write"));
        }
        let mut audit = self.audit.lock().expect("store lock poisoned");
        let stored = AutomationLogEntry {
            id: audit.len() as i64 + 1,
            workflow_name: entry.workflow_name.clone(),
            execution_id: entry.execution_id.clone(),
            status: entry.status,
            payload: entry.payload.clone(),
            result: entry.result.clone(),
            created_at: now_timestamp(),
        };
        audit.push(stored.clone());
        Ok(stored)
    }
}
