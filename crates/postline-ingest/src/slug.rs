// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slug generation and uniqueness resolution.
//!
//! Resolution is a check-then-use against the store with no locking. The
//! store's unique index on `slug` is what actually guarantees uniqueness;
//! callers handle a late collision as [`PostlineError::SlugTaken`].

use std::sync::LazyLock;

use postline_core::{BlogStore, PostlineError};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Maximum number of suffixed candidates tried after the base slug collides.
pub const MAX_SUFFIX_ATTEMPTS: usize = 3;

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// Slug resolution failures.
#[derive(Debug, Error)]
pub enum SlugError {
    /// Neither an explicit slug nor the title produced any slug characters.
    #[error("slug is empty after normalization")]
    Empty,

    /// The base slug and every suffixed variant already exist.
    #[error("no free slug found for `{candidate}` after {MAX_SUFFIX_ATTEMPTS} attempts")]
    Conflict { candidate: String },

    /// The existence check itself failed.
    #[error(transparent)]
    Store(#[from] PostlineError),
}

/// Derive a URL-safe slug from a title.
///
/// Lowercases, replaces every run of characters outside `[a-z0-9]` with a
/// single `-`, and trims `-` from both ends. Non-ASCII letters are treated
/// as separators.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_SLUG_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Pick a slug that does not currently exist in `store`.
///
/// The candidate is `explicit` when given and non-empty, otherwise
/// [`generate_slug`] of `title`. If taken, `-<epoch millis>` is appended,
/// with a strictly increasing timestamp on each retry.
pub async fn resolve_slug(
    explicit: Option<&str>,
    title: &str,
    store: &dyn BlogStore,
) -> Result<String, SlugError> {
    let base = match explicit {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => generate_slug(title),
    };
    if base.is_empty() {
        return Err(SlugError::Empty);
    }
    if !store.slug_exists(&base).await? {
        return Ok(base);
    }

    let mut last_suffix = i64::MIN;
    for attempt in 1..=MAX_SUFFIX_ATTEMPTS {
        let suffix = epoch_millis().max(last_suffix.saturating_add(1));
        last_suffix = suffix;
        let candidate = format!("{base}-{suffix}");
        if !store.slug_exists(&candidate).await? {
            debug!(base = %base, slug = %candidate, attempt, "slug collision resolved with suffix");
            return Ok(candidate);
        }
    }
    Err(SlugError::Conflict { candidate: base })
}
