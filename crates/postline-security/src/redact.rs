// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for log output and error messages.
//!
//! Two complementary mechanisms:
//! 1. **Regex-based**: catches credentials echoed in headers (`Bearer ...`,
//!    `x-webhook-secret: ...`).
//! 2. **Exact-match**: catches the configured webhook secret and
//!    revalidation token wherever they appear.

use std::io::Write;
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;

/// Known credential patterns to redact from output.
static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Bearer tokens in Authorization headers
        r"Bearer\s+[a-zA-Z0-9._~+/=\-]{8,}",
        // Webhook secret header echoes, in header, debug-map, or JSON form
        r#"(?i)(x-webhook-secret"?\s*[:=]\s*"?)[^\s",}]+"#,
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("redaction pattern is valid"))
    .collect()
});

/// The redaction placeholder.
const REDACTED: &str = "[REDACTED]";

/// Redact secrets from a string using regex patterns and exact-match values.
///
/// Usable outside the logging pipeline, for example on error messages that
/// are about to be returned to a caller.
pub fn redact(input: &str, secret_values: &[String]) -> String {
    let mut result = input.to_string();

    for pattern in REDACTION_PATTERNS.iter() {
        // Keep the header name (capture group 1) when the pattern has one.
        result = pattern
            .replace_all(&result, |caps: &regex::Captures<'_>| match caps.get(1) {
                Some(prefix) => format!("{}{REDACTED}", prefix.as_str()),
                None => REDACTED.to_string(),
            })
            .into_owned();
    }

    // Longest first so a secret containing another is replaced whole.
    let mut sorted_values: Vec<&String> = secret_values.iter().collect();
    sorted_values.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted_values {
        if !value.is_empty() {
            result = result.replace(value.as_str(), REDACTED);
        }
    }

    result
}

/// A writer wrapper that redacts secrets from output.
///
/// Wraps any `Write` implementor. A closure returning a `RedactingWriter`
/// can be handed to `tracing_subscriber::fmt().with_writer(...)`.
pub struct RedactingWriter<W> {
    inner: W,
    secret_values: Arc<RwLock<Vec<String>>>,
}

impl<W: Write> RedactingWriter<W> {
    /// Create a new redacting writer.
    pub fn new(inner: W, secret_values: Arc<RwLock<Vec<String>>>) -> Self {
        Self {
            inner,
            secret_values,
        }
    }

    /// Add a value to the shared redaction list. Empty and duplicate values are ignored.
    pub fn add_secret_value(secret_values: &Arc<RwLock<Vec<String>>>, value: String) {
        if value.is_empty() {
            return;
        }
        if let Ok(mut values) = secret_values.write()
            && !values.contains(&value)
        {
            values.push(value);
        }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let input = String::from_utf8_lossy(buf);
        let values = self
            .secret_values
            .read()
            .map(|v| v.clone())
            .unwrap_or_default();
        let redacted = redact(&input, &values);
        self.inner.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
