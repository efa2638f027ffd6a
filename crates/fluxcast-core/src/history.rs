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

//! Aggregation of hourly readings into daily buckets and consumption profiles.

use chrono::Timelike;
use chrono_tz::Tz;
use fluxcast_types::history::{DAYS_PER_WEEK, HOURS_PER_DAY};
use fluxcast_types::{
    DailyBucket, HistoryReading, HistoryStatistics, HourlyProfile, TariffConfig, WeekdayProfile,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Tolerance when comparing an exported rate with the tariff band
const RATE_TOLERANCE: f64 = 1e-6;

/// Readings grouped by local calendar date, with derived profiles
///
/// Input order does not matter. Buckets are kept oldest first so every
/// derived value is independent of how the export was sorted.
#[derive(Debug, Clone)]
pub struct HistoryAggregator {
    buckets: Vec<DailyBucket>,
    timezone: Tz,
}

impl HistoryAggregator {
    pub fn new(readings: &[HistoryReading], timezone: Tz) -> Self {
        let mut by_date: BTreeMap<_, Vec<HistoryReading>> = BTreeMap::new();
        for reading in readings {
            let local_date = reading.timestamp.with_timezone(&timezone).date_naive();
            by_date.entry(local_date).or_default().push(reading.clone());
        }

        let buckets: Vec<DailyBucket> = by_date
            .into_iter()
            .map(|(date, mut day_readings)| {
                day_readings.sort_by_key(|r| r.timestamp);
                DailyBucket::new(date, day_readings)
            })
            .collect();

        debug!(
            "📊 [HISTORY] {} readings grouped into {} local days ({})",
            readings.len(),
            buckets.len(),
            timezone
        );

        Self { buckets, timezone }
    }

    /// Daily buckets, oldest first
    pub fn buckets(&self) -> &[DailyBucket] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Daily totals, oldest first
    pub fn daily_totals(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.total_kwh).collect()
    }

    /// Sum of the most recent `days` daily totals
    pub fn recent_total(&self, days: usize) -> f64 {
        let skip = self.buckets.len().saturating_sub(days);
        self.buckets.iter().skip(skip).map(|b| b.total_kwh).sum()
    }

    /// Population mean and standard deviation of daily totals
    pub fn statistics(&self) -> HistoryStatistics {
        compute_statistics(&self.daily_totals())
    }

    /// Average daily total per weekday; unobserved weekdays get the overall mean
    pub fn weekday_profile(&self) -> WeekdayProfile {
        if self.buckets.is_empty() {
            return WeekdayProfile::default();
        }

        let mut sums = [0.0_f64; DAYS_PER_WEEK];
        let mut counts = [0_usize; DAYS_PER_WEEK];
        for bucket in &self.buckets {
            let idx = usize::from(bucket.weekday_index);
            sums[idx] += bucket.total_kwh;
            counts[idx] += 1;
        }

        let overall_mean = self.statistics().mean_kwh;
        let mut averages_kwh = [overall_mean; DAYS_PER_WEEK];
        for idx in 0..DAYS_PER_WEEK {
            if counts[idx] > 0 {
                averages_kwh[idx] = sums[idx] / counts[idx] as f64;
            }
        }

        WeekdayProfile {
            averages_kwh,
            observed_days: counts,
        }
    }

    /// Share of daily consumption per local hour of day
    ///
    /// Each hour's average reading is divided by the sum of the 24 hourly
    /// averages. Falls back to a flat profile when nothing was consumed.
    pub fn hourly_profile(&self) -> HourlyProfile {
        let mut sums = [0.0_f64; HOURS_PER_DAY];
        let mut counts = [0_usize; HOURS_PER_DAY];
        for reading in self.buckets.iter().flat_map(|b| &b.readings) {
            let hour = self.local_hour(reading);
            sums[hour] += reading.kwh;
            counts[hour] += 1;
        }

        let mut averages = [0.0_f64; HOURS_PER_DAY];
        for hour in 0..HOURS_PER_DAY {
            if counts[hour] > 0 {
                averages[hour] = sums[hour] / counts[hour] as f64;
            }
        }

        let total: f64 = averages.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            debug!("📊 [HISTORY] No usable consumption, using flat hourly profile");
            return HourlyProfile::uniform();
        }

        let mut shares = [0.0_f64; HOURS_PER_DAY];
        for (share, avg) in shares.iter_mut().zip(averages) {
            *share = avg / total;
        }
        HourlyProfile { shares }
    }

    /// Number of readings whose exported rate disagrees with the tariff band of their hour
    pub fn tariff_mismatches(&self, tariff: &TariffConfig) -> usize {
        self.buckets
            .iter()
            .flat_map(|b| &b.readings)
            .filter(|r| {
                r.cost_rate.is_some_and(|rate| {
                    let expected = tariff.rate_for_hour(self.local_hour(r) as u32);
                    (rate - expected).abs() > RATE_TOLERANCE
                })
            })
            .count()
    }

    fn local_hour(&self, reading: &HistoryReading) -> usize {
        reading.timestamp.with_timezone(&self.timezone).hour() as usize % HOURS_PER_DAY
    }
}

/// Population statistics over a set of daily totals
pub fn compute_statistics(totals: &[f64]) -> HistoryStatistics {
    if totals.is_empty() {
        return HistoryStatistics::default();
    }

    let n = totals.len() as f64;
    let mean = totals.iter().sum::<f64>() / n;
    let variance = totals.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;

    HistoryStatistics {
        mean_kwh: mean,
        std_dev_kwh: variance.sqrt(),
        day_count: totals.len(),
    }
}
