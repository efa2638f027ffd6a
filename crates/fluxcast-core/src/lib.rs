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

pub mod daily;
pub mod engine;
pub mod history;
pub mod hourly;
pub mod ingest;
pub mod national;
pub mod rollup;
pub mod traits;
pub mod trend;
pub mod weather_factors;

// Re-export commonly used items
pub use engine::{HistoryProfileReport, PredictionInput, predict, profile_history};
pub use history::HistoryAggregator;
pub use ingest::{IngestError, IngestResult, load_history_file, parse_history};
pub use traits::{NationalGridDataSource, WeatherDataSource};
pub use trend::TrendEstimate;
