// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment errors are turned into miette diagnostics that point at the
//! offending line of `postline.toml`, name the environment variable that
//! would set a missing key, and suggest the closest accepted key for typos
//! (Jaro-Winkler via `strsim`).

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a key must beat to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Prefix of every environment override.
const ENV_PREFIX: &str = "POSTLINE_";

/// A configuration problem, renderable by miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(postline::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest accepted key, if one is close enough.
        suggestion: Option<String>,
        /// Accepted keys of the enclosing table, comma separated.
        valid_keys: String,
        #[label("not a Postline setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(postline::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `server.port`.
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(postline::config::missing_key),
        help("set `{key}` in postline.toml or export {}", env_var_for(key))
    )]
    MissingKey {
        /// Dotted path, e.g. `webhook.secret`.
        key: String,
    },

    #[error("validation error: {message}")]
    #[diagnostic(code(postline::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(postline::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Accepted keys here: {valid_keys}"),
        None => format!("accepted keys here: {valid_keys}"),
    }
}

/// Environment variable that overrides the dotted config `key`.
///
/// `webhook.secret` becomes `POSTLINE_WEBHOOK_SECRET`.
pub fn env_var_for(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "_").to_uppercase())
}

/// TOML sources that were loaded, used to attach spans to errors.
struct Sources<'a> {
    files: &'a [(String, String)],
}

impl<'a> Sources<'a> {
    /// The file an error came from, when figment recorded one we have read.
    fn origin(&self, error: &figment::Error) -> Option<&'a (String, String)> {
        let path = match error.metadata.as_ref()?.source.as_ref()? {
            figment::Source::File(path) => path.display().to_string(),
            _ => return None,
        };
        self.files.iter().find(|(name, _)| *name == path)
    }

    /// Locate `key` inside `table` of the file `error` came from.
    fn locate(
        &self,
        error: &figment::Error,
        table: &[String],
        key: &str,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let Some((name, content)) = self.origin(error) else {
            return (None, None);
        };
        match find_key_offset(content, table, key) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), key.len())),
                Some(NamedSource::new(name, content.clone())),
            ),
            None => (None, None),
        }
    }
}

fn dotted(table: &[String], key: &str) -> String {
    if table.is_empty() {
        key.to_string()
    } else {
        format!("{}.{key}", table.join("."))
    }
}

/// Convert every error inside a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` pairs a file path with its content; errors that originate
/// in one of them get a source span.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    let sources = Sources {
        files: toml_sources,
    };

    err.into_iter()
        .map(|error| {
            let table: Vec<String> = error.path.clone();
            match &error.kind {
                Kind::UnknownField(field, accepted) => {
                    let (span, src) = sources.locate(&error, &table, field);
                    ConfigError::UnknownKey {
                        key: dotted(&table, field),
                        suggestion: suggest_key(field, accepted),
                        valid_keys: accepted.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: dotted(&table, field),
                },
                Kind::InvalidType(actual, expected) => {
                    // For type errors the path already ends with the key itself.
                    let (span, src) = match table.split_last() {
                        Some((key, parent)) => sources.locate(&error, parent, key),
                        None => (None, None),
                    };
                    ConfigError::InvalidType {
                        key: table.join("."),
                        detail: format!("found {actual}, expected {expected}"),
                        expected: expected.to_string(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Byte offset of `key` inside the TOML table `table` (empty for the root).
///
/// Only lines belonging to that table are searched: the scan starts after
/// its `[header]` and stops at the next header. The key must be followed by
/// whitespace or `=`, so `secret` does not match `secret_extra`.
pub fn find_key_offset(content: &str, table: &[String], key: &str) -> Option<usize> {
    let wanted = table.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header
                .split(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
        } else if current == wanted
            && let Some(rest) = trimmed.strip_prefix(key)
            && rest.starts_with([' ', '\t', '='])
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// The accepted key most similar to `unknown`, if any beats the threshold.
pub fn suggest_key(unknown: &str, accepted: &[&str]) -> Option<String> {
    accepted
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Print each error to stderr through miette's graphical report handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> Vec<String> {
        vec![name.to_string()]
    }

    #[test]
    fn suggests_closest_key() {
        let accepted = ["secret", "workflow_name", "expose_storage_errors"];
        assert_eq!(suggest_key("secrte", &accepted), Some("secret".to_string()));

        let accepted = ["base_url", "owner_name"];
        assert_eq!(suggest_key("baseurl", &accepted), Some("base_url".to_string()));
    }

    #[test]
    fn distant_typo_gets_no_suggestion() {
        assert_eq!(suggest_key("zzzzzz", &["host", "port", "log_level"]), None);
    }

    #[test]
    fn env_var_names_follow_loader_mapping() {
        assert_eq!(env_var_for("webhook.secret"), "POSTLINE_WEBHOOK_SECRET");
        assert_eq!(env_var_for("site.base_url"), "POSTLINE_SITE_BASE_URL");
    }

    #[test]
    fn key_offset_found_inside_its_table() {
        let content = "[server]\nport = 80\n\n[webhook]\n  secrte = \"x\"\n";
        let offset = find_key_offset(content, &table("webhook"), "secrte").unwrap();
        assert_eq!(&content[offset..offset + 6], "secrte");
    }

    #[test]
    fn key_offset_stays_within_table() {
        let content = "[server]\nhost = \"a\"\n\n[webhook]\nsecret = \"x\"\n";
        assert!(find_key_offset(content, &table("server"), "secret").is_none());
        assert!(find_key_offset(content, &table("webhook"), "host").is_none());
    }

    #[test]
    fn key_offset_ignores_prefix_matches() {
        let content = "[webhook]\nsecret_extra = 1\n";
        assert!(find_key_offset(content, &table("webhook"), "secret").is_none());
    }

    #[test]
    fn key_offset_at_root() {
        let content = "stray = 1\n[server]\nport = 1\n";
        assert_eq!(find_key_offset(content, &[], "stray"), Some(0));
    }

    #[test]
    fn missing_key_help_names_env_var() {
        let error = ConfigError::MissingKey {
            key: "site.base_url".to_string(),
        };
        let help = error.help().unwrap().to_string();
        assert!(help.contains("POSTLINE_SITE_BASE_URL"));
    }
}
