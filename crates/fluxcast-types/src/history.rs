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

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of hourly slots in a profile
pub const HOURS_PER_DAY: usize = 24;

/// Number of weekdays, indexed 0 = Sunday .. 6 = Saturday
pub const DAYS_PER_WEEK: usize = 7;

/// Single hourly meter reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryReading {
    /// Start of the metered hour
    pub timestamp: DateTime<Utc>,
    /// Energy consumed during the hour (kWh, never negative)
    pub kwh: f64,
    /// Rate reported by the meter export, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_rate: Option<f64>,
}

/// A parsed history export for one household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryDocument {
    pub client_id: String,
    pub readings: Vec<HistoryReading>,
}

/// All readings of one local calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// Local calendar date
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday_index: u8,
    /// Sum of the readings' kWh
    pub total_kwh: f64,
    pub readings: Vec<HistoryReading>,
}

impl DailyBucket {
    pub fn new(date: NaiveDate, readings: Vec<HistoryReading>) -> Self {
        let total_kwh = readings.iter().map(|r| r.kwh).sum();
        Self {
            date,
            weekday_index: weekday_index(date),
            total_kwh,
            readings,
        }
    }
}

/// Weekday index with Sunday as day zero
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always < 7
    date.weekday().num_days_from_sunday() as u8
}

/// Average daily consumption per weekday
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdayProfile {
    /// Average kWh per weekday. Index 0 = Sunday, index 6 = Saturday
    pub averages_kwh: [f64; DAYS_PER_WEEK],
    /// Number of buckets that contributed per weekday (0 = filled with the overall mean)
    pub observed_days: [usize; DAYS_PER_WEEK],
}

impl WeekdayProfile {
    pub fn average_for(&self, weekday_index: u8) -> f64 {
        self.averages_kwh[usize::from(weekday_index) % DAYS_PER_WEEK]
    }

    pub fn average_for_date(&self, date: NaiveDate) -> f64 {
        self.average_for(weekday_index(date))
    }
}

impl Default for WeekdayProfile {
    fn default() -> Self {
        Self {
            averages_kwh: [0.0; DAYS_PER_WEEK],
            observed_days: [0; DAYS_PER_WEEK],
        }
    }
}

/// Normalised share of daily consumption per hour of day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyProfile {
    /// Fraction of the day per hour. Index 0 = 00:00-01:00, index 23 = 23:00-00:00
    pub shares: [f64; HOURS_PER_DAY],
}

impl HourlyProfile {
    /// Flat profile used when no consumption has been observed
    pub fn uniform() -> Self {
        Self {
            shares: [1.0 / HOURS_PER_DAY as f64; HOURS_PER_DAY],
        }
    }

    pub fn share(&self, hour: usize) -> f64 {
        self.shares[hour % HOURS_PER_DAY]
    }

    pub fn total(&self) -> f64 {
        self.shares.iter().sum()
    }
}

impl Default for HourlyProfile {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Population statistics over daily totals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryStatistics {
    pub mean_kwh: f64,
    pub std_dev_kwh: f64,
    pub day_count: usize,
}
