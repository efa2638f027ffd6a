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

//! Spreading a daily total over 24 hours and pricing it.

use fluxcast_types::history::HOURS_PER_DAY;
use fluxcast_types::{BlendConfig, HourlyPrediction, HourlyProfile, TariffConfig, WeatherHourRecord};

/// A daily total split into hours, with tariff costs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySplit {
    pub hourly_kwh: [f64; HOURS_PER_DAY],
    pub hourly_cost: [f64; HOURS_PER_DAY],
    pub peak_kwh: f64,
    pub off_peak_kwh: f64,
    pub cost: f64,
}

/// Blend of the historical profile with normalised thermal weights
///
/// A non-positive weight sum degenerates the thermal part to a flat profile.
pub fn blended_shares(
    profile: &HourlyProfile,
    thermal_weights: &[f64; HOURS_PER_DAY],
    blend: &BlendConfig,
) -> [f64; HOURS_PER_DAY] {
    let weight_sum: f64 = thermal_weights.iter().sum();
    let mut shares = [0.0; HOURS_PER_DAY];
    for (hour, share) in shares.iter_mut().enumerate() {
        let thermal_share = if weight_sum > 0.0 {
            thermal_weights[hour] / weight_sum
        } else {
            1.0 / HOURS_PER_DAY as f64
        };
        *share = blend.historical_weight * profile.share(hour) + blend.thermal_weight * thermal_share;
    }
    shares
}

/// Split `total_kwh` by `shares` and price every hour
pub fn disaggregate(
    total_kwh: f64,
    shares: &[f64; HOURS_PER_DAY],
    tariff: &TariffConfig,
) -> DaySplit {
    let mut split = DaySplit {
        hourly_kwh: [0.0; HOURS_PER_DAY],
        hourly_cost: [0.0; HOURS_PER_DAY],
        peak_kwh: 0.0,
        off_peak_kwh: 0.0,
        cost: 0.0,
    };

    for hour in 0..HOURS_PER_DAY {
        let hour_u32 = hour as u32;
        let kwh = total_kwh * shares[hour];
        let cost = kwh * tariff.rate_for_hour(hour_u32);
        split.hourly_kwh[hour] = kwh;
        split.hourly_cost[hour] = cost;
        split.cost += cost;
        if tariff.is_peak(hour_u32) {
            split.peak_kwh += kwh;
        } else {
            split.off_peak_kwh += kwh;
        }
    }

    split
}

/// Hour label in "HH:00" form
pub fn hour_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// Build the 24 hourly predictions of a split day
pub fn hourly_predictions(
    split: &DaySplit,
    weather: &[Option<&WeatherHourRecord>; HOURS_PER_DAY],
    tariff: &TariffConfig,
) -> Vec<HourlyPrediction> {
    (0..HOURS_PER_DAY)
        .map(|hour| {
            let hour_u32 = hour as u32;
            HourlyPrediction {
                hour: hour_u32,
                label: hour_label(hour_u32),
                kwh: split.hourly_kwh[hour],
                cost: split.hourly_cost[hour],
                is_peak: tariff.is_peak(hour_u32),
                temperature_c: weather[hour].map(|w| w.temperature_c),
                apparent_temperature_c: weather[hour].map(|w| w.apparent_temperature_c),
            }
        })
        .collect()
}
