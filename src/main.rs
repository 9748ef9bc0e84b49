// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! catscan: cat health scan results from the command line

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use catscan::aggregator::{ScanResultAggregator, ScanResultView};
use catscan::api::ScanApiClient;
use catscan::config::AppConfig;
use catscan::models::{AreaKey, ScanPayload};
use catscan::store::PayloadStore;
use catscan::Result;

/// catscan CLI - cat health scan results
#[derive(Parser, Debug)]
#[command(name = "catscan")]
#[command(version)]
#[command(about = "View and serve cat health scan results", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the result view of a payload file
    View {
        /// Payload JSON file ({"session": ..., "result": ...})
        path: PathBuf,

        /// Area to select (e.g. left_eye)
        #[arg(short, long)]
        area: Option<String>,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Add a payload file to the store
    Import {
        path: PathBuf,
    },

    /// Fetch a scan from the back-office API
    Fetch {
        /// Scan id
        id: u64,

        /// Poll until the scan is no longer processing
        #[arg(long)]
        wait: bool,

        /// Don't add the payload to the store
        #[arg(long)]
        no_store: bool,

        /// Skip the back-office health check
        #[arg(long)]
        skip_health_check: bool,
    },

    /// Check that the back-office API is reachable
    Check,

    /// List stored scans
    List {
        /// Number of scans to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Remove every stored payload
    Clear {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },

    /// Start the result web server
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::View { path, area, format } => run_view(&config, &path, area, &format),
        Commands::Import { path } => run_import(&config, &path),
        Commands::Fetch { id, wait, no_store, skip_health_check } => {
            run_fetch(&config, id, wait, no_store, skip_health_check).await
        }
        Commands::Check => run_check(&config).await,
        Commands::List { count } => run_list(&config, count),
        Commands::Clear { force } => run_clear(&config, force),
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.web.host = host;
            }
            if let Some(port) = port {
                config.web.port = port;
            }
            catscan::web::start_server(config).await
        }
        Commands::Config { action } => run_config_command(config, action),
    }
}

fn read_payload(path: &Path) -> Result<ScanPayload> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn store(config: &AppConfig) -> PayloadStore {
    PayloadStore::new(PathBuf::from(&config.store.path))
}

fn build_view(config: &AppConfig, payload: &ScanPayload, area: Option<String>) -> Result<ScanResultView> {
    let session = payload.session()?;
    let mut aggregator = ScanResultAggregator::new()
        .with_fallback_image(&config.display.fallback_image);
    if let Some(area) = area {
        aggregator.set_active_area(AreaKey::from(area));
    }
    Ok(aggregator.view(session, payload.result.as_ref()))
}

fn print_view(view: &ScanResultView) {
    println!("Scan #{} ({})", view.session_id, view.status);
    println!("  Image:     {}", view.hero_image);
    println!("  Remark:    {}", view.summary.remark);
    println!("  Abnormal:  {}", view.summary.abnormal_count);
    println!("  Average:   {:.2}%", view.summary.average_percent);

    if view.details.is_empty() {
        return;
    }
    println!("\nAreas:");
    for d in &view.details {
        let marker = if d.is_active { ">" } else { " " };
        let confidence = d
            .confidence_percent
            .map(|p| format!("{:.2}%", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {:<14} {:<10} {}",
            marker,
            d.area_label,
            d.detail.label.as_deref().unwrap_or("-"),
            confidence
        );
    }

    if let Some(active) = view.active_detail() {
        if let Some(description) = &active.detail.description {
            println!("\n{}", description);
        }
        if let Some(advice) = &active.detail.advice {
            println!("Saran: {}", advice);
        }
    }
}

fn run_view(config: &AppConfig, path: &Path, area: Option<String>, format: &str) -> Result<()> {
    let payload = read_payload(path)?;
    let view = build_view(config, &payload, area)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&view)?),
        _ => print_view(&view),
    }
    Ok(())
}

fn run_import(config: &AppConfig, path: &Path) -> Result<()> {
    let payload = read_payload(path)?;
    store(config).append(&payload)?;
    info!("Imported scan #{} into {}", payload.session()?.id, config.store.path);
    Ok(())
}

fn api_client(config: &AppConfig) -> Result<ScanApiClient> {
    ScanApiClient::new(&config.api.url, Duration::from_secs(config.api.timeout_secs))
}

async fn run_check(config: &AppConfig) -> Result<()> {
    let client = api_client(config)?;
    client.health_check().await?;
    println!("Back-office reachable at {}", client.base_url());
    Ok(())
}

async fn run_fetch(
    config: &AppConfig,
    id: u64,
    wait: bool,
    no_store: bool,
    skip_health_check: bool,
) -> Result<()> {
    let client = api_client(config)?;

    if skip_health_check {
        warn!("Skipping back-office health check");
    } else {
        info!("Checking back-office availability...");
        client.health_check().await?;
    }

    let payload = if wait {
        let interval = Duration::from_secs(config.api.poll_interval_secs);
        client.wait_for_result(id, interval, config.api.poll_attempts).await?
    } else {
        client.fetch_payload(id).await?
    };

    if no_store {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        store(config).append(&payload)?;
        info!("Stored scan #{} ({})", id, payload.session()?.status);
    }
    Ok(())
}

fn run_list(config: &AppConfig, count: usize) -> Result<()> {
    let payloads = store(config).latest(count)?;
    if payloads.is_empty() {
        println!("No scans stored");
        return Ok(());
    }

    println!("Recent scans ({}):", payloads.len());
    for payload in &payloads {
        let view = build_view(config, payload, None)?;
        println!(
            "  #{:<6} {:<11} abnormal {}  avg {:.2}%",
            view.session_id, view.status, view.summary.abnormal_count, view.summary.average_percent
        );
    }
    Ok(())
}

fn run_clear(config: &AppConfig, force: bool) -> Result<()> {
    if !force {
        warn!("This removes every stored payload. Re-run with --force to confirm.");
        return Ok(());
    }
    store(config).clear()?;
    println!("Store cleared");
    Ok(())
}

fn run_config_command(config: AppConfig, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            println!("Wrote default configuration to {:?}", output);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_view_command() {
        let cli = Cli::try_parse_from([
            "catscan", "view", "/tmp/scan.json", "--area", "mouth", "--format", "json"
        ]).unwrap();

        match cli.command {
            Commands::View { path, area, format } => {
                assert_eq!(path, PathBuf::from("/tmp/scan.json"));
                assert_eq!(area.as_deref(), Some("mouth"));
                assert_eq!(format, "json");
            }
            _ => panic!("Expected View command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["catscan", "view", "a.json", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_cli_fetch_command() {
        let cli = Cli::try_parse_from(["catscan", "fetch", "17", "--wait"]).unwrap();
        match cli.command {
            Commands::Fetch { id, wait, no_store, skip_health_check } => {
                assert_eq!(id, 17);
                assert!(wait);
                assert!(!no_store);
                assert!(!skip_health_check);
            }
            _ => panic!("Expected Fetch command"),
        }
    }

    #[test]
    fn test_cli_check_command() {
        let cli = Cli::try_parse_from(["catscan", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_build_view_requires_session() {
        let config = AppConfig::default();
        let err = build_view(&config, &ScanPayload::default(), None).unwrap_err();
        assert!(matches!(err, catscan::CatScanError::MissingSession));
    }
}
