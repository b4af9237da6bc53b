// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Excerpt derivation for posts submitted without one.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of characters kept from the stripped content.
pub const EXCERPT_CHARS: usize = 160;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

/// Build an excerpt from post content.
///
/// Markup tags are removed first, then the text is cut to
/// [`EXCERPT_CHARS`] characters and `"..."` is appended. The result never
/// contains a tag fragment.
pub fn derive_excerpt(content: &str) -> String {
    let text = MARKUP_TAG.replace_all(content, "");
    let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_appends_ellipsis() {
        assert_eq!(derive_excerpt("<p>Short <b>body</b></p>"), "Short body...");
    }

    #[test]
    fn long_content_is_truncated_to_limit() {
        let content = format!("<p>{}</p>", "a".repeat(400));
        let excerpt = derive_excerpt(&content);
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));
        assert!(!excerpt.contains('<'));
    }

    #[test]
    fn tags_straddling_the_limit_do_not_leak() {
        let content = format!("{}<a href=\"https://example.com\">link</a>", "x".repeat(155));
        let excerpt = derive_excerpt(&content);
        assert!(!excerpt.contains("<a"));
        assert!(excerpt.starts_with(&"x".repeat(155)));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let excerpt = derive_excerpt(&"é".repeat(200));
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
    }
}
