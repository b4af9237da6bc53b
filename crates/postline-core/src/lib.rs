// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Postline.
//!
//! This crate provides the error type, the blog and audit domain types, and
//! the storage and cache invalidation traits shared by the rest of the
//! workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PostlineError;
pub use types::{
    AutomationLogEntry, BlogPost, BlogPostSummary, HealthStatus, LogStatus, NewAutomationLog,
    NewBlogPost, PostQuery, PostStatus,
};

pub use traits::{BlogStore, CacheInvalidator, PluginAdapter};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn postline_error_variants_render() {
        let storage = PostlineError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert_eq!(storage.to_string(), "storage error: disk full");

        let taken = PostlineError::SlugTaken {
            slug: "hello-world".into(),
        };
        assert!(taken.is_slug_taken());
        assert!(taken.to_string().contains("hello-world"));
        assert!(!storage.is_slug_taken());

        let _config = PostlineError::Config("test".into());
        let _invalidation = PostlineError::Invalidation {
            message: "test".into(),
            source: None,
        };
        let _server = PostlineError::Server {
            message: "test".into(),
            source: None,
        };
        let _internal = PostlineError::Internal("test".into());
    }

    #[test]
    fn post_status_display_and_parse() {
        for status in [PostStatus::Draft, PostStatus::Published, PostStatus::Scheduled] {
            let s = status.to_string();
            assert_eq!(s, s.to_lowercase());
            assert_eq!(PostStatus::from_str(&s).unwrap(), status);
        }
        assert!(PostStatus::from_str("archived").is_err());
    }

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&PostStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(serde_json::to_string(&LogStatus::Error).unwrap(), "\"error\"");
        assert_eq!(LogStatus::Success.to_string(), "success");
    }

    #[test]
    fn default_query_lists_published_first_page() {
        let query = PostQuery::default();
        assert_eq!(query.status, Some(PostStatus::Published));
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn now_timestamp_is_iso8601_millis() {
        let ts = types::now_timestamp();
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_store<T: BlogStore>() {}
        fn _assert_invalidator<T: CacheInvalidator>() {}
        fn _assert_adapter<T: PluginAdapter>() {}
    }
}
