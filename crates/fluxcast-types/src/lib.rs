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

pub mod config;
pub mod grid;
pub mod history;
pub mod prediction;
pub mod source;
pub mod weather;

// Re-export common types for convenience
pub use config::{
    BlendConfig, ConditionConfig, ConfidenceConfig, DeviceArchetype, ForecastConfig,
    IntervalConfig, SeasonalConfig, TariffConfig, ThermalConfig,
};
pub use grid::{GridMonth, NationalGridSnapshot};
pub use history::{
    DailyBucket, HistoryDocument, HistoryReading, HistoryStatistics, HourlyProfile,
    WeekdayProfile,
};
pub use prediction::{
    Advisory, DayPrediction, DeviceShare, HourlyPrediction, PeakWindow, PredictionResult,
    WeekSummary,
};
pub use source::{SourceKind, Sourced};
pub use weather::{GeoLocation, WeatherCondition, WeatherDayRecord, WeatherHourRecord, WeatherSnapshot};
