// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Postline - webhook ingestion service for automated blog publishing.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use postline_config::{ConfigError, PostlineConfig};

/// Postline - webhook ingestion service for automated blog publishing.
#[derive(Parser, Debug)]
#[command(name = "postline", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Load and validate configuration, then exit.
    CheckConfig,
}

fn load_config(path: Option<&Path>) -> Result<PostlineConfig, Vec<ConfigError>> {
    match path {
        Some(path) => postline_config::load_and_validate_path(path),
        None => postline_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("postline: use --help for available commands");
        return;
    };

    // Configuration problems are fatal before anything binds.
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            postline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match command {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => {
            println!(
                "postline: config ok (listen={}:{}, database={})",
                config.server.host, config.server.port, config.storage.database_path
            );
        }
    }
}
