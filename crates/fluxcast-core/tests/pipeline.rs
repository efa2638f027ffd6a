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

//! Integration tests for the prediction pipeline
//!
//! Full flow: history export -> aggregation -> trend/weather/national factors -> horizon, hours, rollup

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use fluxcast_core::weather_factors::{condition_factor, thermal_factor};
use fluxcast_core::{PredictionInput, parse_history, predict, profile_history};
use fluxcast_types::{
    Advisory, ConditionConfig, ForecastConfig, GridMonth, HistoryReading, NationalGridSnapshot,
    SourceKind, Sourced, ThermalConfig, WeatherCondition, WeatherDayRecord, WeatherHourRecord,
    WeatherSnapshot,
};

/// Hourly readings with a per-day total chosen by `daily_total(date)`
fn history_from(
    start: NaiveDate,
    days: i64,
    daily_total: impl Fn(NaiveDate) -> f64,
) -> Vec<HistoryReading> {
    let mut readings = Vec::new();
    for d in 0..days {
        let date = start + Duration::days(d);
        let base = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap());
        let per_hour = daily_total(date) / 24.0;
        for h in 0..24 {
            readings.push(HistoryReading {
                timestamp: base + Duration::hours(h),
                kwh: per_hour,
                cost_rate: None,
            });
        }
    }
    readings
}

/// Irregular but deterministic hourly history
fn bumpy_history(start: NaiveDate, days: i64) -> Vec<HistoryReading> {
    let base = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap());
    (0..days * 24)
        .map(|i| {
            let hour = i % 24;
            let peak = if (19..=22).contains(&hour) { 1.8 } else { 0.5 };
            let wobble = ((i as f64) * 0.37).sin().abs() * 0.7;
            HistoryReading {
                timestamp: base + Duration::hours(i),
                kwh: peak + wobble,
                cost_rate: Some(if hour < 8 { 0.10 } else { 0.22 }),
            }
        })
        .collect()
}

fn comfortable_snapshot(start: NaiveDate, days: i64) -> Sourced<WeatherSnapshot> {
    let days = (0..days)
        .map(|d| WeatherDayRecord {
            date: start + Duration::days(d),
            mean_temperature_c: 18.0,
            apparent_temperature_c: 18.0,
            humidity_pct: 50.0,
            precipitation_mm: 0.0,
            condition: WeatherCondition::Clear,
            is_forecast: true,
        })
        .collect();
    Sourced::live(WeatherSnapshot {
        current_temperature_c: Some(18.0),
        days,
        hours: Vec::new(),
    })
}

fn neutral_national() -> Sourced<NationalGridSnapshot> {
    Sourced::live(NationalGridSnapshot {
        months: Vec::new(),
        recent_corrected_pct: Some(0.0),
    })
}

fn input<'a>(
    history: &'a [HistoryReading],
    as_of: NaiveDate,
    weather: Option<&'a Sourced<WeatherSnapshot>>,
    national: Option<&'a Sourced<NationalGridSnapshot>>,
) -> PredictionInput<'a> {
    PredictionInput {
        history,
        as_of,
        timezone: chrono_tz::UTC,
        weather,
        national,
    }
}

#[test]
fn test_mondays_double_consumption() {
    // 2026-01-05 is a Monday; four full weeks
    let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let history = history_from(start, 28, |d| {
        if d.weekday() == Weekday::Mon { 10.0 } else { 5.0 }
    });
    let config = ForecastConfig::default();

    let report = profile_history(&history, chrono_tz::UTC, &config);
    assert!((report.weekday_profile.average_for(1) - 10.0).abs() < 1e-9);
    for weekday in [0, 2, 3, 4, 5, 6] {
        assert!((report.weekday_profile.average_for(weekday) - 5.0).abs() < 1e-9);
    }

    // Horizon starts on Monday 2026-02-02 in perfectly comfortable weather
    let as_of = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
    let weather = comfortable_snapshot(as_of, 7);
    let national = neutral_national();
    let result = predict(&input(&history, as_of, Some(&weather), Some(&national)), &config);

    assert!((result.personal_trend - 1.0).abs() < 1e-12);
    assert!((result.days[0].thermal_factor - 1.0).abs() < 1e-12);
    assert!((result.days[0].predicted_kwh - 10.0).abs() < 1e-9);
    assert!((result.days[1].predicted_kwh - 5.0).abs() < 1e-9);
    assert!(result.days.iter().all(|d| d.used_live_weather));
    assert!(!result.advisories.contains(&Advisory::WeatherUnavailable));
}

#[test]
fn test_thermal_and_condition_reference_values() {
    let thermal = ThermalConfig::default();
    assert!((thermal_factor(28.0, &thermal) - 1.20).abs() < 1e-9);
    assert!((thermal_factor(5.0, &thermal) - 1.26).abs() < 1e-9);

    let conditions = ConditionConfig::default();
    assert!((condition_factor(20.0, 90.0, &conditions) - 1.08).abs() < 1e-12);
}

#[test]
fn test_missing_national_equals_neutral_factor() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let history = bumpy_history(start, 21);
    let as_of = NaiveDate::from_ymd_opt(2026, 1, 22).unwrap();
    let config = ForecastConfig::default();
    let national = neutral_national();

    let without = predict(&input(&history, as_of, None, None), &config);
    let with = predict(&input(&history, as_of, None, Some(&national)), &config);

    assert_eq!(without.days, with.days);
    assert_eq!(without.hourly, with.hourly);
    assert_eq!(without.national_factor.source, SourceKind::Fallback);
    assert!(without.advisories.contains(&Advisory::NationalTrendUnavailable));
    assert!(!with.advisories.contains(&Advisory::NationalTrendUnavailable));
}

#[test]
fn test_national_factor_scales_predictions() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let history = bumpy_history(start, 14);
    let as_of = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let config = ForecastConfig::default();
    let national = Sourced::fallback(NationalGridSnapshot {
        months: vec![GridMonth {
            year: 2025,
            month: 1,
            consumption_gwh: 5410.0,
            yoy_pct: 2.1,
            corrected_yoy_pct: 1.7,
        }],
        recent_corrected_pct: None,
    });

    let base = predict(&input(&history, as_of, None, None), &config);
    let scaled = predict(&input(&history, as_of, None, Some(&national)), &config);

    assert!((scaled.national_factor.value - 1.017).abs() < 1e-12);
    assert_eq!(scaled.national_factor.source, SourceKind::Fallback);
    for (a, b) in base.days.iter().zip(&scaled.days) {
        assert!((b.predicted_kwh - a.predicted_kwh * 1.017).abs() < 1e-9);
    }
}

#[test]
fn test_short_history_has_neutral_trend() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let history = history_from(start, 13, |d| 3.0 + f64::from(d.day()));
    let as_of = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();

    let result = predict(&input(&history, as_of, None, None), &ForecastConfig::default());
    assert!((result.personal_trend - 1.0).abs() < f64::EPSILON);
    assert!(
        result
            .advisories
            .contains(&Advisory::InsufficientTrendHistory { days: 13 })
    );
}

#[test]
fn test_extreme_trend_bottoms_out_confidence() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let switch = NaiveDate::from_ymd_opt(2026, 1, 8).unwrap();
    let history = history_from(start, 14, |d| if d < switch { 1.0 } else { 5.0 });
    let as_of = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

    let result = predict(&input(&history, as_of, None, None), &ForecastConfig::default());
    assert!((result.personal_trend - 5.0).abs() < 1e-9);
    assert!((result.confidence_pct - 60.0).abs() < f64::EPSILON);
}

#[test]
fn test_output_invariants() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let history = bumpy_history(start, 30);
    let as_of = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    let config = ForecastConfig::default();

    let report = profile_history(&history, chrono_tz::UTC, &config);
    assert!((report.hourly_profile.total() - 1.0).abs() < 1e-9);
    assert_eq!(report.tariff_mismatches, 0);

    let result = predict(&input(&history, as_of, None, None), &config);
    assert_eq!(result.days.len(), 7);
    assert_eq!(result.hourly.len(), 24);
    assert!((60.0..=95.0).contains(&result.confidence_pct));

    for day in &result.days {
        assert!(0.0 <= day.lower_kwh);
        assert!(day.lower_kwh <= day.predicted_kwh);
        assert!(day.predicted_kwh <= day.upper_kwh);
        assert!((day.peak_kwh + day.off_peak_kwh - day.predicted_kwh).abs() < 1e-9);
    }

    let tomorrow = result.tomorrow().unwrap();
    let hourly_kwh: f64 = result.hourly.iter().map(|h| h.kwh).sum();
    let hourly_cost: f64 = result.hourly.iter().map(|h| h.cost).sum();
    assert!((hourly_kwh - tomorrow.predicted_kwh).abs() < 1e-9);
    assert!((hourly_cost - tomorrow.cost).abs() < 1e-9);

    let device_kwh: f64 = result.devices.iter().map(|d| d.kwh).sum();
    assert!((device_kwh - tomorrow.predicted_kwh).abs() < 1e-9);

    let week_kwh: f64 = result.days.iter().map(|d| d.predicted_kwh).sum();
    assert!((result.week.total_kwh - week_kwh).abs() < 1e-9);

    // Evening peak in the history shows up as tomorrow's peak window
    let window = result.peak_window.as_ref().unwrap();
    assert!((19..=20).contains(&window.start_hour));
}

#[test]
fn test_prediction_is_idempotent() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let history = bumpy_history(start, 20);
    let as_of = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
    let weather = comfortable_snapshot(as_of, 3);
    let config = ForecastConfig::default();

    let first = predict(&input(&history, as_of, Some(&weather), None), &config);
    let second = predict(&input(&history, as_of, Some(&weather), None), &config);
    assert_eq!(first, second);

    // Shuffled input order gives the same result
    let mut reversed = history.clone();
    reversed.reverse();
    let third = predict(&input(&reversed, as_of, Some(&weather), None), &config);
    assert_eq!(first, third);
}

#[test]
fn test_hot_afternoon_shifts_hourly_share() {
    let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let history = history_from(start, 14, |_| 12.0);
    let as_of = NaiveDate::from_ymd_opt(2026, 7, 15).unwrap();
    let tomorrow = as_of + Duration::days(1);

    let mut snapshot = comfortable_snapshot(as_of, 7);
    snapshot.value.hours = (0..24)
        .map(|h| WeatherHourRecord {
            time: tomorrow.and_hms_opt(h, 0, 0).unwrap(),
            temperature_c: if (13..=17).contains(&h) { 36.0 } else { 20.0 },
            apparent_temperature_c: if (13..=17).contains(&h) { 38.0 } else { 18.0 },
            humidity_pct: 40.0,
            precipitation_mm: 0.0,
        })
        .collect();

    let result = predict(
        &input(&history, as_of, Some(&snapshot), None),
        &ForecastConfig::default(),
    );
    assert!(result.hourly[15].kwh > result.hourly[3].kwh);
    assert_eq!(result.hourly[15].apparent_temperature_c, Some(38.0));
    let total: f64 = result.hourly.iter().map(|h| h.kwh).sum();
    assert!((total - result.days[1].predicted_kwh).abs() < 1e-9);
}

#[test]
fn test_weather_gap_falls_back_per_day() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let history = history_from(start, 14, |_| 8.0);
    let as_of = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let weather = comfortable_snapshot(as_of, 3);

    let result = predict(&input(&history, as_of, Some(&weather), None), &ForecastConfig::default());
    assert!(result.days[..3].iter().all(|d| d.used_live_weather));
    assert!(result.days[3..].iter().all(|d| !d.used_live_weather));
    // January seasonal temperature is 11 °C
    assert!((result.days[5].apparent_temperature_c - 11.0).abs() < 1e-12);
    assert!((result.days[5].thermal_factor - 1.14).abs() < 1e-9);
}

#[test]
fn test_parsed_export_feeds_pipeline() {
    let json = r#"{
        "clientId": "GE-HACK-2026",
        "history": [
            { "timestamp": "2026-01-24T07:00:00.000Z", "kwh": 0.9, "cost_rate": 0.1 },
            { "timestamp": "2026-01-24T20:00:00.000Z", "kwh": 2.2, "cost_rate": 0.22 },
            { "timestamp": "2026-01-25T20:00:00.000Z", "kwh": 2.4, "cost_rate": 0.1 }
        ]
    }"#;
    let document = parse_history(json, chrono_tz::Europe::Lisbon).unwrap();
    let as_of = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap();
    let result = predict(
        &PredictionInput {
            history: &document.readings,
            as_of,
            timezone: chrono_tz::Europe::Lisbon,
            weather: None,
            national: None,
        },
        &ForecastConfig::default(),
    );

    assert!(
        result
            .advisories
            .contains(&Advisory::TariffRateMismatch { readings: 1 })
    );
    assert!(result.days.iter().all(|d| d.predicted_kwh > 0.0));
}
