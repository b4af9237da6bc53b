// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Postline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Postline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Every section defaults, but `webhook.secret` and `site.base_url` have no
/// default and must be supplied before validation passes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PostlineConfig {
    /// HTTP listener and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Public site identity.
    #[serde(default)]
    pub site: SiteConfig,

    /// Inbound automation webhook settings.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// On-demand page revalidation settings.
    #[serde(default)]
    pub revalidate: RevalidateConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Public site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Public base URL, used to build post URLs (e.g. `https://example.com`).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Author recorded on posts that do not name one.
    #[serde(default = "default_owner_name")]
    pub owner_name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            owner_name: default_owner_name(),
        }
    }
}

fn default_owner_name() -> String {
    "Vince McDowell".to_string()
}

/// Inbound webhook configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    /// Shared secret expected in the `x-webhook-secret` header.
    #[serde(default)]
    pub secret: Option<String>,

    /// Workflow name written to every automation log entry.
    #[serde(default = "default_workflow_name")]
    pub workflow_name: String,

    /// Return raw storage error messages in 500 responses.
    /// When false, callers get a generic message and the detail is only logged.
    #[serde(default)]
    pub expose_storage_errors: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            workflow_name: default_workflow_name(),
            expose_storage_errors: false,
        }
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .field("workflow_name", &self.workflow_name)
            .field("expose_storage_errors", &self.expose_storage_errors)
            .finish()
    }
}

fn default_workflow_name() -> String {
    "Blog Automation".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "postline.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// On-demand revalidation endpoint of the site renderer.
///
/// With no `url` set, cache invalidation is a logged no-op.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RevalidateConfig {
    /// Endpoint that accepts `POST {"paths": [...]}`.
    #[serde(default)]
    pub url: Option<String>,

    /// Bearer token sent to the revalidation endpoint.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_revalidate_timeout")]
    pub timeout_secs: u64,
}

impl Default for RevalidateConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_revalidate_timeout(),
        }
    }
}

impl std::fmt::Debug for RevalidateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevalidateConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_revalidate_timeout() -> u64 {
    5
}
