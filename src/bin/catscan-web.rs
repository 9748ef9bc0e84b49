// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! catscan result server
//!
//! Standalone web server for the scan result pages.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use catscan::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "catscan-web")]
#[command(version)]
#[command(about = "catscan result page server")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Payload store to serve (overrides config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("catscan web v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading {:?}", args.config))?;

    // Apply CLI overrides
    if let Some(host) = args.host {
        config.web.host = host;
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if let Some(store) = args.store {
        config.store.path = store.to_string_lossy().to_string();
    }

    catscan::web::start_server(config)
        .await
        .context("web server stopped")
}
