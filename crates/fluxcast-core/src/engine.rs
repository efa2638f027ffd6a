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

//! The prediction pipeline entry point.

use crate::daily::{DailyInputs, confidence_pct, predict_day, predict_horizon};
use crate::history::HistoryAggregator;
use crate::hourly::hourly_predictions;
use crate::national::resolve_national_factor;
use crate::rollup::{device_breakdown, peak_window, week_summary};
use crate::trend::{TrendEstimate, estimate_trend};
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use fluxcast_types::{
    Advisory, DailyBucket, ForecastConfig, HistoryReading, HistoryStatistics, HourlyProfile,
    NationalGridSnapshot, PredictionResult, Sourced, WeatherSnapshot, WeekdayProfile,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Inputs of one prediction run
#[derive(Debug, Clone, Copy)]
pub struct PredictionInput<'a> {
    pub history: &'a [HistoryReading],
    /// Local calendar date treated as "today"
    pub as_of: NaiveDate,
    /// Household timezone used to resolve local dates and hours
    pub timezone: Tz,
    pub weather: Option<&'a Sourced<WeatherSnapshot>>,
    pub national: Option<&'a Sourced<NationalGridSnapshot>>,
}

/// Statistical view of a history, without any forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryProfileReport {
    pub buckets: Vec<DailyBucket>,
    pub weekday_profile: WeekdayProfile,
    pub hourly_profile: HourlyProfile,
    pub statistics: HistoryStatistics,
    pub trend: TrendEstimate,
    pub tariff_mismatches: usize,
}

/// Aggregate a history into the profiles the predictor works from
pub fn profile_history(
    history: &[HistoryReading],
    timezone: Tz,
    config: &ForecastConfig,
) -> HistoryProfileReport {
    let aggregator = HistoryAggregator::new(history, timezone);
    HistoryProfileReport {
        weekday_profile: aggregator.weekday_profile(),
        hourly_profile: aggregator.hourly_profile(),
        statistics: aggregator.statistics(),
        trend: estimate_trend(&aggregator.daily_totals(), config.trend_window_days),
        tariff_mismatches: aggregator.tariff_mismatches(&config.tariff),
        buckets: aggregator.buckets().to_vec(),
    }
}

/// Run the full pipeline
///
/// Pure and deterministic: identical inputs give identical output. Missing
/// collaborators and thin history are recovered locally and reported as
/// advisories; the result always carries the full horizon and 24 hours.
pub fn predict(input: &PredictionInput<'_>, config: &ForecastConfig) -> PredictionResult {
    let mut advisories = Vec::new();

    let aggregator = HistoryAggregator::new(input.history, input.timezone);
    if aggregator.is_empty() {
        warn!("⚠️ [PREDICT] History is empty, predictions will be zero");
        advisories.push(Advisory::EmptyHistory);
    }

    let weekday_profile = aggregator.weekday_profile();
    let hourly_profile = aggregator.hourly_profile();
    let statistics = aggregator.statistics();

    let trend = estimate_trend(&aggregator.daily_totals(), config.trend_window_days);
    advisories.extend(trend.advisory.clone());

    let (national_factor, national_advisory) = resolve_national_factor(input.national);
    advisories.extend(national_advisory);

    let mismatches = aggregator.tariff_mismatches(&config.tariff);
    if mismatches > 0 {
        debug!(
            "💶 [PREDICT] {} reading(s) disagree with the fixed tariff",
            mismatches
        );
        advisories.push(Advisory::TariffRateMismatch {
            readings: mismatches,
        });
    }

    let weather = input.weather.map(|w| &w.value);
    let inputs = DailyInputs {
        weekday_profile: &weekday_profile,
        hourly_profile: &hourly_profile,
        statistics: &statistics,
        personal_trend: trend.factor,
        national_factor: national_factor.value,
        weather,
    };

    let horizon = predict_horizon(input.as_of, &inputs, config);
    if !horizon.iter().any(|(day, _)| day.used_live_weather) {
        warn!("⚠️ [PREDICT] No live weather in the horizon, using seasonal averages");
        advisories.push(Advisory::WeatherUnavailable);
    }

    // Tomorrow is normally inside the horizon; predict it separately otherwise
    let tomorrow = input.as_of + Duration::days(1);
    let (tomorrow_day, tomorrow_split) = match horizon.iter().find(|(d, _)| d.date == tomorrow) {
        Some((day, split)) => (day.clone(), *split),
        None => predict_day(tomorrow, &inputs, config),
    };

    let tomorrow_hours = weather.map_or([None; 24], |w| w.hours_for(tomorrow));
    let hourly = hourly_predictions(&tomorrow_split, &tomorrow_hours, &config.tariff);
    let devices = device_breakdown(tomorrow_day.predicted_kwh, &config.devices);
    let peak = peak_window(&hourly, &config.tariff);

    let days: Vec<_> = horizon.into_iter().map(|(day, _)| day).collect();
    let week = week_summary(&days, aggregator.recent_total(config.trend_window_days));
    let confidence = confidence_pct(trend.factor, &config.confidence);

    info!(
        "🔮 [PREDICT] {} days from {}: {:.2} kWh, {:.2} cost, trend {:.3}, national {:.4} ({}), confidence {:.0}%",
        days.len(),
        input.as_of,
        week.total_kwh,
        week.total_cost,
        trend.factor,
        national_factor.value,
        national_factor.source,
        confidence
    );

    PredictionResult {
        as_of: input.as_of,
        days,
        hourly,
        devices,
        week,
        peak_window: peak,
        confidence_pct: confidence,
        personal_trend: trend.factor,
        national_factor,
        advisories,
    }
}
