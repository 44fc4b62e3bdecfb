// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fritzbox_exporter::{Config, Result, run, run_setup};

/// Prometheus exporter for AVM FRITZ!Box smart home and traffic metrics
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the YAML configuration file (default: $HOME/.fritz-mon.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a configuration file interactively
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.debug);

    if let Some(Command::Setup) = cli.command {
        return run_setup().await;
    }

    let path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&path).map_err(|e| {
        tracing::error!("Failed to load configuration from {}: {}", path.display(), e);
        tracing::info!("Run `fritzbox-exporter setup` to create a configuration file");
        e
    })?;
    tracing::debug!("Loaded configuration: {:?}", config);

    run(config).await
}

fn setup_tracing(debug: bool) {
    // RUST_LOG wins when set
    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
