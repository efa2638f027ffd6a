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

use crate::source::Sourced;
use crate::weather::WeatherCondition;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Forecast for one calendar day of the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPrediction {
    pub date: NaiveDate,
    /// Short label such as "Mon 26 Jan"
    pub label: String,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday_index: u8,

    // === Energy ===
    pub predicted_kwh: f64,
    pub lower_kwh: f64,
    pub upper_kwh: f64,
    pub peak_kwh: f64,
    pub off_peak_kwh: f64,
    pub cost: f64,

    // === Weather inputs ===
    pub mean_temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub condition: WeatherCondition,
    pub thermal_factor: f64,
    pub condition_factor: f64,
    /// False when the seasonal table stood in for the weather snapshot
    pub used_live_weather: bool,
}

/// Forecast for one hour of tomorrow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPrediction {
    pub hour: u32,
    /// "HH:00"
    pub label: String,
    pub kwh: f64,
    pub cost: f64,
    pub is_peak: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparent_temperature_c: Option<f64>,
}

/// Part of a day's consumption attributed to one appliance archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceShare {
    pub name: String,
    pub kwh: f64,
    /// Percent of the day total
    pub percent: f64,
    pub color: String,
}

/// Horizon totals compared with the most recent observed week
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeekSummary {
    pub total_kwh: f64,
    pub total_cost: f64,
    /// Sum of the last 7 historical daily totals
    pub previous_week_kwh: f64,
    /// 0 when there is no previous week to compare against
    pub change_pct: f64,
}

/// Most expensive 3-hour stretch of tomorrow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakWindow {
    pub start_hour: u32,
    /// Exclusive
    pub end_hour: u32,
    /// "HH:00 - HH:00"
    pub label: String,
    pub kwh: f64,
    pub cost: f64,
    /// Saved if the window's consumption ran at the off-peak rate
    pub potential_savings: f64,
}

/// Local recovery the pipeline applied instead of failing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// No readings at all, every prediction is zero
    EmptyHistory,
    /// Too few days for a personal trend, neutral trend used
    InsufficientTrendHistory { days: usize },
    /// Previous trend window averaged zero kWh, neutral trend used
    ZeroBaselineTrend,
    /// No horizon day had live weather, seasonal table used throughout
    WeatherUnavailable,
    /// National trend missing, neutral factor used
    NationalTrendUnavailable,
    /// Readings whose exported rate disagrees with the tariff band of their hour
    TariffRateMismatch { readings: usize },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHistory => write!(f, "history is empty, predictions are zero"),
            Self::InsufficientTrendHistory { days } => write!(
                f,
                "only {days} day(s) of history, personal trend held at 1.00"
            ),
            Self::ZeroBaselineTrend => {
                write!(f, "previous week has no consumption, personal trend held at 1.00")
            }
            Self::WeatherUnavailable => {
                write!(f, "weather unavailable, seasonal averages used")
            }
            Self::NationalTrendUnavailable => {
                write!(f, "national trend unavailable, factor held at 1.0000")
            }
            Self::TariffRateMismatch { readings } => write!(
                f,
                "{readings} reading(s) report a rate different from the fixed tariff"
            ),
        }
    }
}

/// Complete output of one prediction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The "today" the horizon starts at
    pub as_of: NaiveDate,
    pub days: Vec<DayPrediction>,
    /// 24 entries for the day after `as_of`
    pub hourly: Vec<HourlyPrediction>,
    /// Apportioning of tomorrow's total
    pub devices: Vec<DeviceShare>,
    pub week: WeekSummary,
    pub peak_window: Option<PeakWindow>,
    /// Horizon-wide confidence (%)
    pub confidence_pct: f64,
    pub personal_trend: f64,
    pub national_factor: Sourced<f64>,
    pub advisories: Vec<Advisory>,
}

impl PredictionResult {
    /// Prediction for the day after `as_of`
    pub fn tomorrow(&self) -> Option<&DayPrediction> {
        self.days.get(1)
    }
}
