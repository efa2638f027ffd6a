// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::Result;
use clap::Parser;
use fluxcast_cli::app::{run_generate, run_predict, run_profile};
use fluxcast_cli::cli::{Cli, Commands};
use fluxcast_cli::config::AppConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Loaded before tracing is installed, so its own log lines are not shown
    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize tracing with env filter support
    // Respects RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.system.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    for warning in config.validate_detailed().warnings {
        warn!("⚠️ Config {}", warning);
    }

    match &cli.command {
        Commands::Predict(args) => run_predict(&config, args).await,
        Commands::Profile(args) => run_profile(&config, args),
        Commands::Generate(args) => run_generate(&config, args),
    }
}
