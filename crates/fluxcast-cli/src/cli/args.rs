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

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fluxcast")]
#[command(author, version, about = "FluxCast household consumption forecaster")]
#[command(
    long_about = "Forecasts household electricity consumption for the next 7 days from an hourly\n\
    meter history, local weather and the national consumption trend.\n\
    \nExamples:\n  \
    fluxcast generate --out raw_history.json    # Synthetic 30-day history\n  \
    fluxcast predict --history raw_history.json # Forecast with live weather\n  \
    fluxcast predict --offline --hourly         # No network, seasonal weather\n  \
    fluxcast profile --history raw_history.json # Inspect the learned profiles"
)]
pub struct Cli {
    /// Config file (TOML, or JSON by extension)
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Configuration file",
        long_help = "Path to a fluxcast config file.\n\
          Without it, fluxcast.toml then fluxcast.json in the working directory are tried,\n\
          then defaults with FLUXCAST_* environment overrides."
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Forecast the next 7 days, tomorrow's hours and device breakdown
    #[command(
        long_about = "Run the full forecast pipeline.\n\
        \nCollaborators (each optional, missing data degrades to neutral factors):\n  \
        - Weather: Open-Meteo, or --weather-json <path>\n  \
        - National trend: REN Datahub, or --national-json <path>\n\
        \nExamples:\n  \
        fluxcast predict --history raw_history.json\n  \
        fluxcast predict --as-of 2026-02-23 --offline --output json\n  \
        fluxcast predict --output both --csv-path forecast.csv --hourly"
    )]
    Predict(PredictArgs),

    /// Show weekday averages, hourly profile, statistics and trend
    #[command(
        long_about = "Aggregate a history export without forecasting.\n\
        \nUseful to check how readings land on local calendar days.\n\
        \nExamples:\n  \
        fluxcast profile --history raw_history.json\n  \
        fluxcast profile --output json"
    )]
    Profile(ProfileArgs),

    /// Generate a synthetic hourly history export
    #[command(
        long_about = "Write a synthetic history in the export format accepted by predict.\n\
        \nEvening hours (19-22) carry a higher base load, and every hour gets random noise.\n\
        Use --seed for reproducible output.\n\
        \nExamples:\n  \
        fluxcast generate --out raw_history.json\n  \
        fluxcast generate --days 60 --seed 7 --out long.json"
    )]
    Generate(GenerateArgs),
}

#[derive(Debug, Parser)]
pub struct PredictArgs {
    /// History export (JSON)
    #[arg(
        long,
        value_name = "PATH",
        help = "History export to forecast from",
        long_help = "JSON export with clientId and hourly readings.\n\
          Falls back to history.path from the config.\n\
          \nExample: --history raw_history.json"
    )]
    pub history: Option<String>,

    /// Reference date (YYYY-MM-DD), defaults to today in the configured timezone
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Date the forecast is made on",
        long_help = "The horizon starts on this date; 'tomorrow' is the day after.\n\
          Defaults to today in system.timezone."
    )]
    pub as_of: Option<String>,

    /// Weather snapshot JSON instead of Open-Meteo
    #[arg(long, value_name = "PATH", help = "Saved weather snapshot to use")]
    pub weather_json: Option<String>,

    /// National grid snapshot JSON instead of REN
    #[arg(long, value_name = "PATH", help = "Saved national grid snapshot to use")]
    pub national_json: Option<String>,

    /// Skip all network calls
    #[arg(
        long,
        default_value_t = false,
        help = "Do not contact Open-Meteo or REN",
        long_help = "Skip network collaborators.\n\
          Weather falls back to seasonal averages and the national trend to the bundled table,\n\
          unless snapshot files are given."
    )]
    pub offline: bool,

    /// Output format: table, json, csv, or both
    #[arg(long, default_value = "table",
          value_parser = ["table", "json", "csv", "both"],
          help = "How to display results")]
    pub output: String,

    /// CSV file path (required when output is csv or both)
    #[arg(
        long,
        value_name = "PATH",
        help = "Where to save the daily forecast CSV",
        long_help = "Path for the daily CSV export.\n\
          With --hourly, tomorrow's hours go to <name>_hourly.csv next to it.\n\
          Required when --output is 'csv' or 'both'."
    )]
    pub csv_path: Option<String>,

    /// Include tomorrow's hour-by-hour table
    #[arg(long, default_value_t = false, help = "Show tomorrow's 24 hours")]
    pub hourly: bool,

    /// Include the device breakdown
    #[arg(long, default_value_t = false, help = "Show tomorrow's device breakdown")]
    pub devices: bool,
}

#[derive(Debug, Parser)]
pub struct ProfileArgs {
    /// History export (JSON)
    #[arg(long, value_name = "PATH", help = "History export to aggregate")]
    pub history: Option<String>,

    /// Output format: table or json
    #[arg(long, default_value = "table",
          value_parser = ["table", "json"],
          help = "How to display results")]
    pub output: String,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Number of days to generate
    #[arg(long, default_value_t = 30, help = "Days of hourly readings")]
    pub days: u32,

    /// First local date (YYYY-MM-DD)
    #[arg(long, default_value = "2026-01-24", value_name = "YYYY-MM-DD")]
    pub start: String,

    /// Client identifier written into the export
    #[arg(long, default_value = "GE-HACK-2026")]
    pub client_id: String,

    /// RNG seed for reproducible output
    #[arg(long, help = "Seed for the noise generator (random when omitted)")]
    pub seed: Option<u64>,

    /// Output file, stdout when omitted
    #[arg(long, value_name = "PATH")]
    pub out: Option<String>,
}
