// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes:
//! required secrets, well-formed URLs, non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::PostlineConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PostlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Webhook secret is required; an empty one would authenticate nobody.
    match config.webhook.secret.as_deref() {
        None => errors.push(ConfigError::MissingKey {
            key: "webhook.secret".to_string(),
        }),
        Some(secret) if secret.trim().is_empty() => errors.push(ConfigError::Validation {
            message: "webhook.secret must not be empty".to_string(),
        }),
        Some(_) => {}
    }

    match config.site.base_url.as_deref() {
        None => errors.push(ConfigError::MissingKey {
            key: "site.base_url".to_string(),
        }),
        Some(base_url) => {
            if let Err(message) = check_http_url(base_url) {
                errors.push(ConfigError::Validation {
                    message: format!("site.base_url {message}"),
                });
            }
        }
    }

    if config.site.owner_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "site.owner_name must not be empty".to_string(),
        });
    }

    if config.webhook.workflow_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "webhook.workflow_name must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate host looks like a valid IP or hostname
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if let Some(url) = config.revalidate.url.as_deref()
        && let Err(message) = check_http_url(url)
    {
        errors.push(ConfigError::Validation {
            message: format!("revalidate.url {message}"),
        });
    }

    if config.revalidate.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "revalidate.timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that `raw` parses as an absolute http(s) URL.
fn check_http_url(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| format!("`{raw}` is not a valid URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("`{raw}` must use http or https, got `{other}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PostlineConfig {
        let mut config = PostlineConfig::default();
        config.webhook.secret = Some("test-secret-123".to_string());
        config.site.base_url = Some("https://example.com".to_string());
        config
    }

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors.iter().any(|e| match e {
            ConfigError::Validation { message } => message.contains(needle),
            ConfigError::MissingKey { key } => key.contains(needle),
            _ => false,
        })
    }

    #[test]
    fn complete_config_validates() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn bare_defaults_report_every_required_key() {
        let errors = validate_config(&PostlineConfig::default()).unwrap_err();
        assert!(has_message(&errors, "webhook.secret"));
        assert!(has_message(&errors, "site.base_url"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn blank_secret_fails_validation() {
        let mut config = valid_config();
        config.webhook.secret = Some("   ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "webhook.secret must not be empty"));
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let mut config = valid_config();
        config.site.base_url = Some("ftp://example.com".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "must use http or https"));

        config.site.base_url = Some("not a url".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "is not a valid URL"));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = valid_config();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn invalid_host_fails_validation() {
        let mut config = valid_config();
        config.server.host = "bad host!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "server.host"));
    }

    #[test]
    fn revalidate_settings_are_checked() {
        let mut config = valid_config();
        config.revalidate.url = Some("mailto:ops@example.com".to_string());
        config.revalidate.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "revalidate.url"));
        assert!(has_message(&errors, "revalidate.timeout_secs"));
    }

    #[test]
    fn deny_unknown_fields_in_webhook_section() {
        let toml_str = r#"
[webhook]
secret = "abc"
secrte = "typo"
"#;
        let result = toml::from_str::<PostlineConfig>(toml_str);
        assert!(result.is_err());
    }
}
