// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postline serve` command implementation.
//!
//! Wires the SQLite store, the cache invalidator, the ingestion pipeline and
//! the HTTP router together, then serves until SIGINT or SIGTERM.

use std::sync::{Arc, RwLock};

use axum::Router;
use postline_config::model::{PostlineConfig, RevalidateConfig};
use postline_core::{BlogStore, CacheInvalidator, PluginAdapter, PostlineError};
use postline_gateway::{AppState, HealthState, ServerConfig, WebhookAuth, build_router};
use postline_ingest::{HttpRevalidator, IngestPipeline, IngestSettings, NoopInvalidator};
use postline_security::RedactingWriter;
use postline_storage::SqliteStore;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `postline serve` command.
///
/// Returns once the server has drained after a shutdown signal and the
/// store has checkpointed its WAL.
pub async fn run_serve(config: PostlineConfig) -> Result<(), PostlineError> {
    init_tracing(&config.server.log_level, secret_values(&config));

    info!(version = env!("CARGO_PKG_VERSION"), "starting postline serve");

    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let app = build_app(&config, store.clone())?;

    let cancel = shutdown::install_signal_handler();
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let served = postline_gateway::start_server(&server_config, app, async move {
        cancel.cancelled().await;
    })
    .await;

    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }
    served?;

    info!("postline stopped");
    Ok(())
}

/// Assemble the router over an initialized store.
fn build_app(config: &PostlineConfig, store: Arc<SqliteStore>) -> Result<Router, PostlineError> {
    let secret = config
        .webhook
        .secret
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PostlineError::Config("webhook.secret is required".to_string()))?;

    let invalidator = select_invalidator(&config.revalidate)?;
    let store: Arc<dyn BlogStore> = store;
    let pipeline = IngestPipeline::new(
        Arc::clone(&store),
        invalidator,
        IngestSettings::from_config(config),
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        store,
        expose_storage_errors: config.webhook.expose_storage_errors,
        health: HealthState::default(),
    };
    Ok(build_router(state, WebhookAuth::new(secret)))
}

/// The HTTP revalidator when an endpoint is configured, a logging no-op otherwise.
fn select_invalidator(
    config: &RevalidateConfig,
) -> Result<Arc<dyn CacheInvalidator>, PostlineError> {
    match HttpRevalidator::from_config(config)? {
        Some(revalidator) => {
            info!(url = ?config.url, "cache revalidation enabled");
            Ok(Arc::new(revalidator))
        }
        None => {
            info!("no revalidation endpoint configured, cache invalidation disabled");
            Ok(Arc::new(NoopInvalidator))
        }
    }
}

/// Configured secrets that must never reach the log output.
fn secret_values(config: &PostlineConfig) -> Vec<String> {
    [&config.webhook.secret, &config.revalidate.token]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect()
}

/// Initializes the tracing subscriber with an env filter and log redaction.
fn init_tracing(log_level: &str, secrets: Vec<String>) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("postline={log_level},warn")));

    let values = Arc::new(RwLock::new(Vec::new()));
    for secret in secrets {
        RedactingWriter::<std::io::Stderr>::add_secret_value(&values, secret);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), Arc::clone(&values)))
        .init();
}
