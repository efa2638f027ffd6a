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

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Household coordinates used for weather lookups
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for GeoLocation {
    /// Lisbon
    fn default() -> Self {
        Self {
            latitude: 38.7223,
            longitude: -9.1393,
        }
    }
}

/// Human readable sky condition for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Storm,
    HeavyRain,
    Rain,
    Drizzle,
    Overcast,
    PartlyCloudy,
    #[default]
    Clear,
}

impl WeatherCondition {
    /// Classify a day from its precipitation total and average humidity
    pub fn classify(precipitation_mm: f64, humidity_pct: f64) -> Self {
        if precipitation_mm > 15.0 {
            Self::Storm
        } else if precipitation_mm > 5.0 {
            Self::HeavyRain
        } else if precipitation_mm > 1.0 {
            Self::Rain
        } else if precipitation_mm > 0.2 {
            Self::Drizzle
        } else if humidity_pct > 85.0 {
            Self::Overcast
        } else if humidity_pct > 65.0 {
            Self::PartlyCloudy
        } else {
            Self::Clear
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Storm => "Storm",
            Self::HeavyRain => "Heavy rain",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Overcast => "Overcast",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Clear => "Clear",
        };
        write!(f, "{label}")
    }
}

/// Weather aggregated to one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDayRecord {
    pub date: NaiveDate,
    /// Daytime mean air temperature (°C)
    pub mean_temperature_c: f64,
    /// Daytime mean apparent temperature (°C)
    pub apparent_temperature_c: f64,
    /// Daytime mean relative humidity (%)
    pub humidity_pct: f64,
    /// Whole-day precipitation total (mm)
    pub precipitation_mm: f64,
    pub condition: WeatherCondition,
    /// True for today and later
    pub is_forecast: bool,
}

/// Weather for a single local hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherHourRecord {
    /// Local wall-clock time, truncated to the hour
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
}

impl WeatherHourRecord {
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }
}

/// Everything the weather collaborator returns for one location
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub current_temperature_c: Option<f64>,
    #[serde(default)]
    pub days: Vec<WeatherDayRecord>,
    #[serde(default)]
    pub hours: Vec<WeatherHourRecord>,
}

impl WeatherSnapshot {
    /// Record for a calendar date, if the snapshot covers it
    pub fn day(&self, date: NaiveDate) -> Option<&WeatherDayRecord> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Hourly records of a calendar date, indexed by hour of day
    pub fn hours_for(&self, date: NaiveDate) -> [Option<&WeatherHourRecord>; 24] {
        let mut slots = [None; 24];
        for record in self.hours.iter().filter(|h| h.date() == date) {
            if let Some(slot) = slots.get_mut(record.hour() as usize) {
                // Keep the first record when the upstream repeats an hour
                if slot.is_none() {
                    *slot = Some(record);
                }
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_ladder_first_match_wins() {
        assert_eq!(WeatherCondition::classify(20.0, 95.0), WeatherCondition::Storm);
        assert_eq!(WeatherCondition::classify(6.0, 40.0), WeatherCondition::HeavyRain);
        assert_eq!(WeatherCondition::classify(1.5, 40.0), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::classify(0.5, 90.0), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::classify(0.0, 90.0), WeatherCondition::Overcast);
        assert_eq!(WeatherCondition::classify(0.0, 70.0), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::classify(0.0, 60.0), WeatherCondition::Clear);
    }

    #[test]
    fn test_hours_for_indexes_by_hour() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let snapshot = WeatherSnapshot {
            current_temperature_c: None,
            days: vec![],
            hours: vec![WeatherHourRecord {
                time: date.and_hms_opt(14, 0, 0).unwrap(),
                temperature_c: 16.0,
                apparent_temperature_c: 15.2,
                humidity_pct: 70.0,
                precipitation_mm: 0.0,
            }],
        };

        let slots = snapshot.hours_for(date);
        assert!(slots[14].is_some());
        assert_eq!(slots.iter().filter(|s| s.is_some()).count(), 1);
        assert!(snapshot.hours_for(date.succ_opt().unwrap())[14].is_none());
    }
}
