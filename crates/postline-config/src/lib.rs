// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for Postline.
//!
//! Settings are layered with figment (compiled defaults, system file, user
//! file, `./postline.toml`, then `POSTLINE_*` variables), deserialized with
//! `deny_unknown_fields`, and validated as a whole. Every problem found is
//! returned at once as a [`ConfigError`] that miette can render with source
//! spans and "did you mean" hints.
//!
//! ```no_run
//! let config = match postline_config::load_and_validate() {
//!     Ok(config) => config,
//!     Err(errors) => {
//!         postline_config::render_errors(&errors);
//!         std::process::exit(1);
//!     }
//! };
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PostlineConfig;

/// Load from the standard file hierarchy plus environment, then validate.
pub fn load_and_validate() -> Result<PostlineConfig, Vec<ConfigError>> {
    finish(loader::load_config(), hierarchy_sources)
}

/// Load from `path` plus environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<PostlineConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load from an inline TOML document, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<PostlineConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate a loaded config, or convert the load failure into diagnostics.
///
/// Sources are only read when there is an error to annotate.
fn finish(
    loaded: Result<PostlineConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<PostlineConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    Some((path.display().to_string(), content))
}

/// Contents of every hierarchy file that exists, keyed the way figment
/// reports their paths.
fn hierarchy_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into());
    let user = dirs::config_dir().map(|dir| dir.join("postline/postline.toml"));

    [Some(local), user, Some(loader::SYSTEM_CONFIG_PATH.into())]
        .into_iter()
        .flatten()
        .filter_map(|path: std::path::PathBuf| read_source(&path))
        .collect()
}
