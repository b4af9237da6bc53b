// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML sanitization for webhook-supplied post bodies.
//!
//! Content is cleaned against a fixed allowlist before it is stored, so
//! whatever the automation produces can be rendered on the site as-is.
//! Anything outside the allowlist is dropped: unknown tags are unwrapped
//! to their text, event handlers and `data-*` attributes are removed, and
//! links keep only safe URL schemes.

use std::sync::LazyLock;

use ammonia::Builder;

/// Tags that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "b", "i", "u", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li",
    "a", "blockquote", "code", "pre",
];

/// Attributes allowed on any surviving tag.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "target", "rel", "class"];

/// URL schemes an `href` may use. Relative links pass through.
const URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Tags removed together with everything inside them.
const STRIPPED_WITH_CONTENT: &[&str] = &["script", "style"];

static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::empty();
    builder
        .add_tags(ALLOWED_TAGS)
        .add_generic_attributes(ALLOWED_ATTRIBUTES)
        .add_url_schemes(URL_SCHEMES)
        .add_clean_content_tags(STRIPPED_WITH_CONTENT)
        // `rel` is caller-controlled, so ammonia must not also inject one.
        .link_rel(None);
    builder
});

/// Clean `html` against the post allowlist.
pub fn sanitize_html(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_removed_with_its_body() {
        let clean = sanitize_html("<p>Hello</p><script>alert('x')</script>");
        assert_eq!(clean, "<p>Hello</p>");
    }

    #[test]
    fn event_handlers_are_stripped() {
        let clean = sanitize_html(r#"<p onclick="steal()">Tap</p><img src="x" onerror="steal()">"#);
        assert_eq!(clean, "<p>Tap</p>");
        assert!(!clean.contains("onerror"));
    }

    #[test]
    fn allowed_markup_survives() {
        let html = concat!(
            "<h2>Recovery</h2>",
            "<p>Read <strong>this</strong> <a href=\"https://example.com/a\" target=\"_blank\">guide</a>.</p>",
            "<ul><li>one</li></ul>",
            "<pre><code class=\"lang\">x</code></pre>",
        );
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn javascript_links_lose_their_href() {
        let clean = sanitize_html(r#"<a href="javascript:alert(1)">click</a>"#);
        assert!(!clean.contains("javascript"));
        assert!(clean.contains("click"));
    }

    #[test]
    fn relative_links_are_kept() {
        let clean = sanitize_html(r#"<a href="/blog/other-post">more</a>"#);
        assert_eq!(clean, r#"<a href="/blog/other-post">more</a>"#);
    }

    #[test]
    fn unknown_tags_keep_their_text() {
        assert_eq!(sanitize_html("<div><span>plain</span></div>"), "plain");
    }

    #[test]
    fn data_and_style_attributes_are_dropped() {
        let clean = sanitize_html(r#"<p data-track="1" style="color:red" class="lead">t</p>"#);
        assert_eq!(clean, r#"<p class="lead">t</p>"#);
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize_html("This is test content"), "This is test content");
    }
}
