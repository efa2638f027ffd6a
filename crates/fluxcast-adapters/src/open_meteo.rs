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

//! Open-Meteo forecast API client.

use crate::errors::{AdapterError, AdapterResult};
use crate::http::JsonHttpClient;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use fluxcast_core::national::round_to;
use fluxcast_core::traits::WeatherDataSource;
use fluxcast_types::{
    GeoLocation, Sourced, WeatherCondition, WeatherDayRecord, WeatherHourRecord, WeatherSnapshot,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const SERVICE: &str = "Open-Meteo";

/// Public Open-Meteo endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

/// Hours (inclusive) whose temperatures make up a day's averages
const DAYTIME_HOURS: std::ops::RangeInclusive<u32> = 7..=21;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentBlock>,
    #[serde(default)]
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
}

/// Weather collaborator backed by the Open-Meteo forecast API
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    http: JsonHttpClient,
    past_days: u32,
    forecast_days: u32,
    /// IANA zone the hourly times are returned in, `auto` for the location's own
    timezone: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AdapterResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            http: JsonHttpClient::new(timeout)?,
            past_days: 5,
            forecast_days: 7,
            timezone: "auto".to_owned(),
        })
    }

    /// Override the observation window around today
    #[must_use]
    pub fn with_window(mut self, past_days: u32, forecast_days: u32) -> Self {
        self.past_days = past_days;
        self.forecast_days = forecast_days;
        self
    }

    /// Return hourly times in `timezone` so they line up with the history's local days
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    #[must_use]
    pub fn with_http(mut self, http: JsonHttpClient) -> Self {
        self.http = http;
        self
    }

    /// Fetch hourly weather and aggregate it into days
    pub async fn get_snapshot(
        &self,
        location: GeoLocation,
        today: NaiveDate,
    ) -> AdapterResult<WeatherSnapshot> {
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));
        let query = [
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("timezone", self.timezone.clone()),
            ("past_days", self.past_days.to_string()),
            ("forecast_days", self.forecast_days.to_string()),
            ("current", "temperature_2m".to_owned()),
            (
                "hourly",
                "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation".to_owned(),
            ),
        ];

        let response: ForecastResponse = self.http.get_json(SERVICE, &url, &query).await?;
        let hours = hourly_records(&response.hourly.unwrap_or_default())?;
        let days = aggregate_days(&hours, today);

        info!(
            "✅ [{}] {} hourly records, {} days for ({:.4}, {:.4})",
            SERVICE,
            hours.len(),
            days.len(),
            location.latitude,
            location.longitude
        );

        Ok(WeatherSnapshot {
            current_temperature_c: response.current.and_then(|c| c.temperature_2m),
            days,
            hours,
        })
    }
}

#[async_trait]
impl WeatherDataSource for OpenMeteoClient {
    async fn fetch_snapshot(
        &self,
        location: GeoLocation,
        today: NaiveDate,
    ) -> anyhow::Result<Sourced<WeatherSnapshot>> {
        Ok(Sourced::live(self.get_snapshot(location, today).await?))
    }

    fn name(&self) -> &str {
        SERVICE
    }
}

/// Flatten the parallel hourly arrays into records
///
/// Missing values read as zero. Unparsable times are skipped.
fn hourly_records(block: &HourlyBlock) -> AdapterResult<Vec<WeatherHourRecord>> {
    if block.time.is_empty() {
        return Err(AdapterError::InvalidResponse {
            service: SERVICE,
            reason: "no hourly data".to_owned(),
        });
    }

    let value = |series: &[Option<f64>], idx: usize| series.get(idx).copied().flatten().unwrap_or(0.0);

    let mut records = Vec::with_capacity(block.time.len());
    for (idx, time) in block.time.iter().enumerate() {
        let Ok(time) = NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M") else {
            warn!("⚠️ [{}] Skipping unparsable hour '{}'", SERVICE, time);
            continue;
        };
        records.push(WeatherHourRecord {
            time,
            temperature_c: round_to(value(&block.temperature_2m, idx), 1),
            apparent_temperature_c: round_to(value(&block.apparent_temperature, idx), 1),
            humidity_pct: value(&block.relative_humidity_2m, idx).round(),
            precipitation_mm: round_to(value(&block.precipitation, idx), 2),
        });
    }
    Ok(records)
}

#[derive(Default)]
struct DayAccumulator {
    temperatures: Vec<f64>,
    apparent: Vec<f64>,
    humidity: Vec<f64>,
    precipitation_mm: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Aggregate hourly records into local calendar days
///
/// Temperatures and humidity average over daytime hours, precipitation sums
/// over the whole day. Days from `today` on are marked as forecast.
pub fn aggregate_days(hours: &[WeatherHourRecord], today: NaiveDate) -> Vec<WeatherDayRecord> {
    let mut by_date: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for hour in hours {
        let acc = by_date.entry(hour.date()).or_default();
        acc.precipitation_mm += hour.precipitation_mm;
        if DAYTIME_HOURS.contains(&hour.hour()) {
            acc.temperatures.push(hour.temperature_c);
            acc.apparent.push(hour.apparent_temperature_c);
            acc.humidity.push(hour.humidity_pct);
        }
    }

    by_date
        .into_iter()
        .map(|(date, acc)| {
            let humidity = mean(&acc.humidity).round();
            let record = WeatherDayRecord {
                date,
                mean_temperature_c: round_to(mean(&acc.temperatures), 1),
                apparent_temperature_c: round_to(mean(&acc.apparent), 1),
                humidity_pct: humidity,
                precipitation_mm: round_to(acc.precipitation_mm, 1),
                condition: WeatherCondition::classify(acc.precipitation_mm, humidity),
                is_forecast: date >= today,
            };
            debug!(
                "🌦️ [{}] {}: {:.1}°C (feels {:.1}°C), {:.0}%, {:.1} mm, {}",
                SERVICE,
                record.date,
                record.mean_temperature_c,
                record.apparent_temperature_c,
                record.humidity_pct,
                record.precipitation_mm,
                record.condition
            );
            record
        })
        .collect()
}
