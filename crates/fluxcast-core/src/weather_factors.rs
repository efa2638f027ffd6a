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

//! Weather-driven multiplicative adjustments.

use chrono::{Datelike, NaiveDate};
use fluxcast_types::history::HOURS_PER_DAY;
use fluxcast_types::{
    ConditionConfig, SeasonalConfig, ThermalConfig, WeatherCondition, WeatherHourRecord,
    WeatherSnapshot,
};

/// Heating/cooling multiplier for an apparent temperature
pub fn thermal_factor(apparent_temperature_c: f64, config: &ThermalConfig) -> f64 {
    1.0 + (apparent_temperature_c - config.comfort_temperature_c).abs()
        * config.coefficient_per_degree
}

/// Precipitation/humidity multiplier, first matching rung wins
pub fn condition_factor(precipitation_mm: f64, humidity_pct: f64, config: &ConditionConfig) -> f64 {
    if precipitation_mm > config.storm_precipitation_mm {
        config.storm_factor
    } else if precipitation_mm > config.heavy_rain_precipitation_mm {
        config.heavy_rain_factor
    } else if precipitation_mm > config.rain_precipitation_mm {
        config.rain_factor
    } else if humidity_pct > config.humid_threshold_pct {
        config.humid_factor
    } else {
        config.base_factor
    }
}

/// Weather inputs resolved for one calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayWeather {
    pub mean_temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub condition: WeatherCondition,
    /// True when taken from the snapshot rather than the seasonal table
    pub live: bool,
}

impl DayWeather {
    /// Climatological stand-in for a date the snapshot does not cover
    pub fn seasonal(date: NaiveDate, config: &SeasonalConfig) -> Self {
        let temperature = config.temperature_for_month(date.month());
        Self {
            mean_temperature_c: temperature,
            apparent_temperature_c: temperature,
            humidity_pct: config.humidity_pct,
            precipitation_mm: config.precipitation_mm,
            condition: WeatherCondition::classify(config.precipitation_mm, config.humidity_pct),
            live: false,
        }
    }

    /// Snapshot record for `date`, or the seasonal stand-in
    pub fn resolve(
        snapshot: Option<&WeatherSnapshot>,
        date: NaiveDate,
        seasonal: &SeasonalConfig,
    ) -> Self {
        match snapshot.and_then(|s| s.day(date)) {
            Some(day) => Self {
                mean_temperature_c: day.mean_temperature_c,
                apparent_temperature_c: day.apparent_temperature_c,
                humidity_pct: day.humidity_pct,
                precipitation_mm: day.precipitation_mm,
                condition: day.condition,
                live: true,
            },
            None => Self::seasonal(date, seasonal),
        }
    }
}

/// Per-hour thermal weights for a day
///
/// Hours without a snapshot record use the day's apparent temperature.
pub fn hourly_thermal_weights(
    hours: &[Option<&WeatherHourRecord>; HOURS_PER_DAY],
    day_apparent_temperature_c: f64,
    config: &ThermalConfig,
) -> [f64; HOURS_PER_DAY] {
    let mut weights = [0.0; HOURS_PER_DAY];
    for (weight, hour) in weights.iter_mut().zip(hours) {
        let apparent = hour.map_or(day_apparent_temperature_c, |h| h.apparent_temperature_c);
        *weight = thermal_factor(apparent, config);
    }
    weights
}
