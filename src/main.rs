// ABOUTME: Main entry point for skydeck
//
// Binary: skydeck
// Usage: skydeck [--format text|json] <COMMAND>
// - servers: list servers, start/stop/reboot/delete one
// - deploy: provision a server through the wizard
// - preview: print a server or container manifest
// - checklist: onboarding progress
// - stats: dashboard counts
// - catalog: wizard option catalogs

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use tracing::info;

use skydeck::cli::{self, Cli, Commands, OutputFormat};
use skydeck::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = Cli::parse();
    let config = AppConfig::load()?;
    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_preference(&config.ui_preferences.output_format));
    info!(version = env!("CARGO_PKG_VERSION"), "skydeck starting");

    match args.command {
        Commands::Servers(servers) => cli::servers::execute(servers.action, &config, format).await,
        Commands::Deploy(deploy) => cli::deploy::execute(deploy, &config, format).await,
        Commands::Preview(preview) => cli::preview::execute(preview.target, &config).await,
        Commands::Checklist(checklist) => {
            cli::checklist::execute(checklist.action, &config, format).await
        }
        Commands::Stats => cli::stats::execute(&config, format).await,
        Commands::Catalog => cli::catalog::execute(&config, format).await,
    }
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::prelude::*;

    // Create log directory if it doesn't exist
    let log_dir = std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".skydeck").join("logs"))
        .unwrap_or_else(|_| PathBuf::from(".skydeck/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    // Create JSONL log file with timestamp
    let log_file = log_dir.join(format!(
        "skydeck-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .expect("Failed to create log file");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skydeck=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
