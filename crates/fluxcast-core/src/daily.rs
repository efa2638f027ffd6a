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

//! Daily predictions over the forecast horizon.

use crate::hourly::{DaySplit, blended_shares, disaggregate};
use crate::weather_factors::{DayWeather, condition_factor, hourly_thermal_weights, thermal_factor};
use chrono::{Duration, NaiveDate};
use fluxcast_types::history::weekday_index;
use fluxcast_types::{
    ConfidenceConfig, DayPrediction, ForecastConfig, HistoryStatistics, HourlyProfile,
    WeatherSnapshot, WeekdayProfile,
};
use tracing::debug;

/// Everything the daily predictor needs besides the date
#[derive(Debug, Clone, Copy)]
pub struct DailyInputs<'a> {
    pub weekday_profile: &'a WeekdayProfile,
    pub hourly_profile: &'a HourlyProfile,
    pub statistics: &'a HistoryStatistics,
    pub personal_trend: f64,
    pub national_factor: f64,
    pub weather: Option<&'a WeatherSnapshot>,
}

/// Horizon-wide confidence, clamped to the configured band
pub fn confidence_pct(personal_trend: f64, config: &ConfidenceConfig) -> f64 {
    let raw = config.base_pct - (personal_trend - 1.0).abs() * config.trend_penalty;
    raw.clamp(config.min_pct, config.max_pct)
}

/// Short day label such as "Mon 26 Jan"
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a %d %b").to_string()
}

/// Predict one calendar day and split it into tariff bands
///
/// Returns the split as well so callers can reuse the hourly breakdown.
pub fn predict_day(
    date: NaiveDate,
    inputs: &DailyInputs<'_>,
    config: &ForecastConfig,
) -> (DayPrediction, DaySplit) {
    let weather = DayWeather::resolve(inputs.weather, date, &config.seasonal);
    let thermal = thermal_factor(weather.apparent_temperature_c, &config.thermal);
    let condition = condition_factor(
        weather.precipitation_mm,
        weather.humidity_pct,
        &config.conditions,
    );

    let base = inputs.weekday_profile.average_for_date(date);
    let predicted = base * inputs.personal_trend * thermal * condition * inputs.national_factor;
    let half_width = config.interval.std_dev_multiplier * inputs.statistics.std_dev_kwh;

    let hours = inputs
        .weather
        .map(|s| s.hours_for(date))
        .unwrap_or([None; 24]);
    let weights = hourly_thermal_weights(&hours, weather.apparent_temperature_c, &config.thermal);
    let shares = blended_shares(inputs.hourly_profile, &weights, &config.blend);
    let split = disaggregate(predicted, &shares, &config.tariff);

    debug!(
        "📅 [DAILY] {}: base {:.3} x trend {:.4} x thermal {:.3} x cond {:.2} x national {:.4} = {:.3} kWh{}",
        date,
        base,
        inputs.personal_trend,
        thermal,
        condition,
        inputs.national_factor,
        predicted,
        if weather.live { "" } else { " (seasonal)" }
    );

    let prediction = DayPrediction {
        date,
        label: day_label(date),
        weekday_index: weekday_index(date),
        predicted_kwh: predicted,
        lower_kwh: (predicted - half_width).max(0.0),
        upper_kwh: predicted + half_width,
        peak_kwh: split.peak_kwh,
        off_peak_kwh: split.off_peak_kwh,
        cost: split.cost,
        mean_temperature_c: weather.mean_temperature_c,
        apparent_temperature_c: weather.apparent_temperature_c,
        humidity_pct: weather.humidity_pct,
        precipitation_mm: weather.precipitation_mm,
        condition: weather.condition,
        thermal_factor: thermal,
        condition_factor: condition,
        used_live_weather: weather.live,
    };

    (prediction, split)
}

/// Predict `config.horizon_days` consecutive days starting at `today`
pub fn predict_horizon(
    today: NaiveDate,
    inputs: &DailyInputs<'_>,
    config: &ForecastConfig,
) -> Vec<(DayPrediction, DaySplit)> {
    (0..config.horizon_days)
        .map(|offset| {
            let date = today + Duration::days(offset as i64);
            predict_day(date, inputs, config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxcast_types::{WeatherCondition, WeatherDayRecord};

    fn flat_inputs<'a>(
        weekday: &'a WeekdayProfile,
        profile: &'a HourlyProfile,
        stats: &'a HistoryStatistics,
        weather: Option<&'a WeatherSnapshot>,
    ) -> DailyInputs<'a> {
        DailyInputs {
            weekday_profile: weekday,
            hourly_profile: profile,
            statistics: stats,
            personal_trend: 1.0,
            national_factor: 1.0,
            weather,
        }
    }

    fn comfortable_day(date: NaiveDate) -> WeatherDayRecord {
        WeatherDayRecord {
            date,
            mean_temperature_c: 18.0,
            apparent_temperature_c: 18.0,
            humidity_pct: 50.0,
            precipitation_mm: 0.0,
            condition: WeatherCondition::Clear,
            is_forecast: true,
        }
    }

    #[test]
    fn test_confidence_band() {
        let cfg = ConfidenceConfig::default();
        assert!((confidence_pct(1.0, &cfg) - 95.0).abs() < 1e-12);
        assert!((confidence_pct(1.1, &cfg) - 85.0).abs() < 1e-9);
        assert!((confidence_pct(0.9, &cfg) - 85.0).abs() < 1e-9);
        assert!((confidence_pct(5.0, &cfg) - 60.0).abs() < 1e-12);
        assert!((confidence_pct(0.0, &cfg) - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_day_label() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap();
        assert_eq!(day_label(date), "Mon 26 Jan");
    }

    #[test]
    fn test_neutral_weather_keeps_weekday_average() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(); // Monday
        let mut weekday = WeekdayProfile::default();
        weekday.averages_kwh = [5.0, 10.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let profile = HourlyProfile::uniform();
        let stats = HistoryStatistics {
            mean_kwh: 5.7,
            std_dev_kwh: 2.0,
            day_count: 14,
        };
        let snapshot = WeatherSnapshot {
            current_temperature_c: None,
            days: vec![comfortable_day(date)],
            hours: vec![],
        };

        let (day, split) = predict_day(
            date,
            &flat_inputs(&weekday, &profile, &stats, Some(&snapshot)),
            &ForecastConfig::default(),
        );
        assert!((day.predicted_kwh - 10.0).abs() < 1e-9);
        assert!((day.lower_kwh - 8.4).abs() < 1e-9);
        assert!((day.upper_kwh - 11.6).abs() < 1e-9);
        assert!(day.used_live_weather);
        assert!((day.peak_kwh + day.off_peak_kwh - day.predicted_kwh).abs() < 1e-9);
        assert!((split.hourly_kwh.iter().sum::<f64>() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_lower_bound_is_clamped_at_zero() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap();
        let mut weekday = WeekdayProfile::default();
        weekday.averages_kwh = [1.0; 7];
        let profile = HourlyProfile::uniform();
        let stats = HistoryStatistics {
            mean_kwh: 1.0,
            std_dev_kwh: 10.0,
            day_count: 7,
        };
        let (day, _) = predict_day(
            date,
            &flat_inputs(&weekday, &profile, &stats, None),
            &ForecastConfig::default(),
        );
        assert!(day.lower_kwh.abs() < f64::EPSILON);
        assert!(day.upper_kwh > day.predicted_kwh);
        assert!(!day.used_live_weather);
    }

    #[test]
    fn test_horizon_is_consecutive_days() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let weekday = WeekdayProfile::default();
        let profile = HourlyProfile::uniform();
        let stats = HistoryStatistics::default();
        let days = predict_horizon(
            today,
            &flat_inputs(&weekday, &profile, &stats, None),
            &ForecastConfig::default(),
        );
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].0.date, today);
        assert_eq!(days[2].0.date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert!(days.iter().all(|(d, _)| d.predicted_kwh.abs() < f64::EPSILON));
    }
}
