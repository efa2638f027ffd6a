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

//! Weekly totals, device apportioning and the peak window.

use crate::hourly::hour_label;
use fluxcast_types::{
    DayPrediction, DeviceArchetype, DeviceShare, HourlyPrediction, PeakWindow, TariffConfig,
    WeekSummary,
};

/// Length of the reported peak window (hours)
pub const PEAK_WINDOW_HOURS: usize = 3;

/// Horizon totals against the last observed week
pub fn week_summary(days: &[DayPrediction], previous_week_kwh: f64) -> WeekSummary {
    let total_kwh: f64 = days.iter().map(|d| d.predicted_kwh).sum();
    let total_cost: f64 = days.iter().map(|d| d.cost).sum();

    let change_pct = if previous_week_kwh > 0.0 {
        (total_kwh - previous_week_kwh) / previous_week_kwh * 100.0
    } else {
        0.0
    };

    WeekSummary {
        total_kwh,
        total_cost,
        previous_week_kwh,
        change_pct,
    }
}

/// Split a day total across the device catalog by nominal daily energy
///
/// The last device takes the remainder so the shares add up to the total
/// exactly.
pub fn device_breakdown(day_total_kwh: f64, devices: &[DeviceArchetype]) -> Vec<DeviceShare> {
    let weight_sum: f64 = devices.iter().map(DeviceArchetype::weight_kwh).sum();
    if devices.is_empty() || weight_sum <= 0.0 {
        return Vec::new();
    }

    let mut assigned = 0.0;
    let last = devices.len() - 1;
    devices
        .iter()
        .enumerate()
        .map(|(idx, device)| {
            let kwh = if idx == last {
                day_total_kwh - assigned
            } else {
                day_total_kwh * device.weight_kwh() / weight_sum
            };
            assigned += kwh;

            let percent = if day_total_kwh > 0.0 {
                kwh / day_total_kwh * 100.0
            } else {
                0.0
            };

            DeviceShare {
                name: device.name.clone(),
                kwh,
                percent,
                color: device.color.clone(),
            }
        })
        .collect()
}

/// Contiguous window of tomorrow with the highest consumption
///
/// Earliest window wins a tie. `None` for fewer hours than the window.
pub fn peak_window(hourly: &[HourlyPrediction], tariff: &TariffConfig) -> Option<PeakWindow> {
    let best = hourly
        .windows(PEAK_WINDOW_HOURS)
        .enumerate()
        .fold(None::<(usize, f64)>, |best, (start, window)| {
            let kwh: f64 = window.iter().map(|h| h.kwh).sum();
            match best {
                Some((_, best_kwh)) if best_kwh >= kwh => best,
                _ => Some((start, kwh)),
            }
        })?;

    let (start, kwh) = best;
    let window = &hourly[start..start + PEAK_WINDOW_HOURS];
    let cost: f64 = window.iter().map(|h| h.cost).sum();
    let start_hour = window[0].hour;
    let end_hour = (start_hour + PEAK_WINDOW_HOURS as u32) % 24;

    Some(PeakWindow {
        start_hour,
        end_hour,
        label: format!("{} - {}", hour_label(start_hour), hour_label(end_hour)),
        kwh,
        cost,
        potential_savings: (cost - kwh * tariff.off_peak_rate).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hourly::{disaggregate, hourly_predictions};
    use chrono::NaiveDate;
    use fluxcast_types::WeatherCondition;

    fn make_day(kwh: f64, cost: f64) -> DayPrediction {
        DayPrediction {
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            label: "Sun 01 Feb".to_owned(),
            weekday_index: 0,
            predicted_kwh: kwh,
            lower_kwh: kwh,
            upper_kwh: kwh,
            peak_kwh: kwh,
            off_peak_kwh: 0.0,
            cost,
            mean_temperature_c: 12.0,
            apparent_temperature_c: 12.0,
            humidity_pct: 60.0,
            precipitation_mm: 0.0,
            condition: WeatherCondition::Clear,
            thermal_factor: 1.0,
            condition_factor: 1.0,
            used_live_weather: false,
        }
    }

    #[test]
    fn test_week_summary_change() {
        let days = vec![make_day(10.0, 2.0); 7];
        let summary = week_summary(&days, 56.0);
        assert!((summary.total_kwh - 70.0).abs() < 1e-9);
        assert!((summary.total_cost - 14.0).abs() < 1e-9);
        assert!((summary.change_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_week_summary_without_history() {
        let summary = week_summary(&[make_day(10.0, 2.0)], 0.0);
        assert!(summary.change_pct.abs() < f64::EPSILON);
    }

    #[test]
    fn test_device_shares_sum_to_total() {
        let shares = device_breakdown(13.37, &DeviceArchetype::catalog());
        assert_eq!(shares.len(), 8);
        let sum: f64 = shares.iter().map(|s| s.kwh).sum();
        assert!((sum - 13.37).abs() < 1e-12);
        let pct: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((pct - 100.0).abs() < 1e-9);
        // Air conditioner carries the largest nominal weight
        let max = shares.iter().map(|s| s.kwh).fold(f64::MIN, f64::max);
        assert!((shares[0].kwh - max).abs() < 1e-12);
    }

    #[test]
    fn test_device_shares_for_zero_day() {
        let shares = device_breakdown(0.0, &DeviceArchetype::catalog());
        assert!(shares.iter().all(|s| s.kwh.abs() < 1e-12 && s.percent.abs() < 1e-12));
        assert!(device_breakdown(5.0, &[]).is_empty());
    }

    #[test]
    fn test_peak_window_finds_evening() {
        let tariff = TariffConfig::default();
        let mut shares = [0.02; 24];
        shares[19] = 0.12;
        shares[20] = 0.14;
        shares[21] = 0.16;
        let split = disaggregate(10.0, &shares, &tariff);
        let hourly = hourly_predictions(&split, &[None; 24], &tariff);

        let window = peak_window(&hourly, &tariff).unwrap();
        assert_eq!(window.start_hour, 19);
        assert_eq!(window.end_hour, 22);
        assert_eq!(window.label, "19:00 - 22:00");
        assert!((window.kwh - 4.2).abs() < 1e-9);
        assert!((window.potential_savings - 4.2 * 0.12).abs() < 1e-9);
    }

    #[test]
    fn test_peak_window_needs_three_hours() {
        assert!(peak_window(&[], &TariffConfig::default()).is_none());
    }
}
