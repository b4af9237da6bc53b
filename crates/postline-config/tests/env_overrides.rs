// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment overrides through the public loaders.
//!
//! Kept apart from the other config tests: these set process-wide
//! `POSTLINE_*` variables that would leak into loads running in parallel.

use std::path::Path;

use postline_config::{load_and_validate, load_and_validate_path};

/// The webhook secret can come from the environment alone.
#[test]
fn env_supplies_secret_missing_from_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "p.toml",
            r#"
[site]
base_url = "https://example.com"
"#,
        )?;
        jail.set_env("POSTLINE_WEBHOOK_SECRET", "from-env");
        jail.set_env("POSTLINE_SERVER_PORT", "8088");

        let config = load_and_validate_path(Path::new("p.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.webhook.secret.as_deref(), Some("from-env"));
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.site.base_url.as_deref(), Some("https://example.com"));
        Ok(())
    });
}

/// Every required key can be supplied without any config file.
#[test]
fn env_alone_yields_valid_config() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("POSTLINE_WEBHOOK_SECRET", "env-only");
        jail.set_env("POSTLINE_SITE_BASE_URL", "https://env.example");
        jail.set_env("POSTLINE_WEBHOOK_WORKFLOW_NAME", "Env Workflow");

        let config = load_and_validate().map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.webhook.secret.as_deref(), Some("env-only"));
        assert_eq!(config.site.base_url.as_deref(), Some("https://env.example"));
        assert_eq!(config.webhook.workflow_name, "Env Workflow");
        Ok(())
    });
}
