// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the BlogStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use postline_config::model::StorageConfig;
use postline_core::{
    AutomationLogEntry, BlogPost, BlogPostSummary, BlogStore, HealthStatus, NewAutomationLog,
    NewBlogPost, PluginAdapter, PostQuery, PostlineError,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed blog store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened on first use; concurrent first calls share a
/// single open.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new store for the given configuration.
    ///
    /// No file is touched until the first operation or [`BlogStore::initialize`].
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the database, opening it if this is the first access.
    async fn db(&self) -> Result<&Database, PostlineError> {
        self.db
            .get_or_try_init(|| async {
                let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
                debug!(path = %self.config.database_path, "SQLite storage initialized");
                Ok(db)
            })
            .await
    }

    /// Fetch a full post by slug.
    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, PostlineError> {
        queries::posts::get_post_by_slug(self.db().await?, slug).await
    }

    /// The most recent automation log entries, newest first.
    pub async fn recent_automation_logs(
        &self,
        limit: u32,
    ) -> Result<Vec<AutomationLogEntry>, PostlineError> {
        queries::automation_logs::list_recent(self.db().await?, limit).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, PostlineError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".to_string()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), PostlineError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlogStore for SqliteStore {
    async fn initialize(&self) -> Result<(), PostlineError> {
        self.db().await.map(|_| ())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, PostlineError> {
        queries::posts::slug_exists(self.db().await?, slug).await
    }

    async fn insert_post(&self, post: &NewBlogPost) -> Result<BlogPost, PostlineError> {
        queries::posts::insert_post(self.db().await?, post).await
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<BlogPostSummary>, PostlineError> {
        queries::posts::list_posts(self.db().await?, query).await
    }

    async fn append_automation_log(
        &self,
        entry: &NewAutomationLog,
    ) -> Result<AutomationLogEntry, PostlineError> {
        queries::automation_logs::append(self.db().await?, entry).await
    }
}
