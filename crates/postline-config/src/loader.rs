// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./postline.toml` > `~/.config/postline/postline.toml` > `/etc/postline/postline.toml`
//! with environment variable overrides via `POSTLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PostlineConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/postline/postline.toml";

/// Local config file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "postline.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/postline/postline.toml` (system-wide)
/// 3. `~/.config/postline/postline.toml` (user XDG config)
/// 4. `./postline.toml` (local directory)
/// 5. `POSTLINE_*` environment variables
pub fn load_config() -> Result<PostlineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PostlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PostlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PostlineConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("postline/postline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Map an env var key (prefix stripped, any case) to its dotted config path.
///
/// Only the first underscore after the section name becomes a dot, so
/// `WEBHOOK_WORKFLOW_NAME` maps to `webhook.workflow_name`, not
/// `webhook.workflow.name`.
pub fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 5] = ["server", "site", "webhook", "storage", "revalidate"];
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
        {
            return format!("{section}.{field}");
        }
    }
    key
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because field names
/// themselves contain underscores.
fn env_provider() -> Env {
    Env::prefixed("POSTLINE_").map(|key| map_env_key(key.as_str()).into())
}
