// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache invalidation trait for rendered page caches.

use async_trait::async_trait;

use crate::error::PostlineError;

/// Signals that rendered pages derived from blog content are stale.
#[async_trait]
pub trait CacheInvalidator: Send + Sync + 'static {
    /// Marks the given site paths (e.g. `/blog`, `/blog/my-post`) as stale.
    async fn invalidate(&self, paths: &[String]) -> Result<(), PostlineError>;
}
