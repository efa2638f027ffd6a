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

//! Output formatters for forecasts and history profiles.

use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use fluxcast_core::HistoryProfileReport;
use fluxcast_types::{PredictionResult, SourceKind};
use serde::Serialize;
use std::path::Path;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Formatter for pretty tables
#[derive(Debug)]
pub struct TableFormatter;

/// Formatter for CSV export
#[derive(Debug)]
pub struct CsvFormatter;

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(*name).add_attribute(Attribute::Bold))
        .collect()
}

fn source_label(source: SourceKind) -> Cell {
    match source {
        SourceKind::Live => Cell::new("live").fg(Color::Green),
        SourceKind::Cached => Cell::new("cached"),
        SourceKind::Fallback => Cell::new("fallback").fg(Color::Yellow),
    }
}

impl TableFormatter {
    /// 7-day horizon plus the run summary
    pub fn format_prediction(result: &PredictionResult, currency: &str) -> String {
        let mut output = String::new();

        let cost_header = format!("Cost\n({currency})");
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "Day",
            "Consumption\n(kWh)",
            "Range\n(kWh)",
            "Peak /\nOff-peak",
            cost_header.as_str(),
            "Feels like\n(°C)",
            "Weather",
        ]));

        for (idx, day) in result.days.iter().enumerate() {
            let label = if idx == 1 {
                Cell::new(format!("{} (tomorrow)", day.label))
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold)
            } else {
                Cell::new(&day.label)
            };
            let weather = if day.used_live_weather {
                Cell::new(day.condition.to_string())
            } else {
                Cell::new(format!("{} (seasonal)", day.condition)).fg(Color::Yellow)
            };

            table.add_row(vec![
                label,
                Cell::new(format!("{:.2}", day.predicted_kwh)),
                Cell::new(format!("{:.2} - {:.2}", day.lower_kwh, day.upper_kwh)),
                Cell::new(format!("{:.2} / {:.2}", day.peak_kwh, day.off_peak_kwh)),
                Cell::new(format!("{:.2}", day.cost)),
                Cell::new(format!("{:.1}", day.apparent_temperature_c)),
                weather,
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        let mut summary = Table::new();
        summary.load_preset(UTF8_FULL);
        summary.add_row(vec![
            Cell::new("Confidence"),
            Cell::new(format!("{:.0}%", result.confidence_pct)),
        ]);
        summary.add_row(vec![
            Cell::new("Personal trend"),
            Cell::new(format!("{:.3}", result.personal_trend)),
        ]);
        summary.add_row(vec![
            Cell::new("National factor"),
            Cell::new(format!("{:.4}", result.national_factor.value)),
        ]);
        summary.add_row(vec![
            Cell::new("National data"),
            source_label(result.national_factor.source),
        ]);
        summary.add_row(vec![
            Cell::new("Next 7 days"),
            Cell::new(format!(
                "{:.2} kWh / {:.2} {}",
                result.week.total_kwh, result.week.total_cost, currency
            )),
        ]);
        summary.add_row(vec![
            Cell::new("vs previous week"),
            Cell::new(format!(
                "{:+.1}% ({:.2} kWh)",
                result.week.change_pct, result.week.previous_week_kwh
            )),
        ]);
        if let Some(window) = &result.peak_window {
            summary.add_row(vec![
                Cell::new("Peak window"),
                Cell::new(format!(
                    "{} ({:.2} kWh, save up to {:.2} {})",
                    window.label, window.kwh, window.potential_savings, currency
                )),
            ]);
        }
        output.push_str(&summary.to_string());
        output.push('\n');

        if !result.advisories.is_empty() {
            output.push_str("\nNotes:\n");
            for advisory in &result.advisories {
                output.push_str(&format!("  - {advisory}\n"));
            }
        }

        output
    }

    /// Tomorrow hour by hour
    pub fn format_hourly(result: &PredictionResult, currency: &str) -> String {
        let cost_header = format!("Cost\n({currency})");
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "Hour",
            "kWh",
            cost_header.as_str(),
            "Tariff",
            "Temp\n(°C)",
        ]));

        let window = result
            .peak_window
            .as_ref()
            .map(|w| w.start_hour..w.end_hour);

        for hour in &result.hourly {
            let label = if window.as_ref().is_some_and(|w| w.contains(&hour.hour)) {
                Cell::new(&hour.label).fg(Color::Red)
            } else {
                Cell::new(&hour.label)
            };
            table.add_row(vec![
                label,
                Cell::new(format!("{:.3}", hour.kwh)),
                Cell::new(format!("{:.3}", hour.cost)),
                Cell::new(if hour.is_peak { "peak" } else { "off-peak" }),
                Cell::new(
                    hour.temperature_c
                        .map_or_else(|| "-".to_string(), |t| format!("{t:.1}")),
                ),
            ]);
        }

        let mut output = format!("\n=== Tomorrow by hour ===\n{table}\n");
        if let Some(tomorrow) = result.tomorrow() {
            output.push_str(&format!(
                "Total: {:.2} kWh / {:.2} {}\n",
                tomorrow.predicted_kwh, tomorrow.cost, currency
            ));
        }
        output
    }

    /// Tomorrow split across the device catalog
    pub fn format_devices(result: &PredictionResult) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&["Device", "kWh", "Share"]));

        for device in &result.devices {
            table.add_row(vec![
                Cell::new(&device.name),
                Cell::new(format!("{:.2}", device.kwh)),
                Cell::new(format!("{:.1}%", device.percent)),
            ]);
        }

        format!("\n=== Device breakdown (tomorrow) ===\n{table}\n")
    }

    /// Learned profiles of a history export
    pub fn format_profile(report: &HistoryProfileReport) -> String {
        let mut output = String::new();

        let mut weekdays = Table::new();
        weekdays.load_preset(UTF8_FULL);
        weekdays.set_header(header(&["Weekday", "Average (kWh)", "Days observed"]));
        // Monday first
        for idx in [1usize, 2, 3, 4, 5, 6, 0] {
            let observed = report.weekday_profile.observed_days[idx];
            let average = Cell::new(format!("{:.2}", report.weekday_profile.averages_kwh[idx]));
            weekdays.add_row(vec![
                Cell::new(WEEKDAYS[idx]),
                if observed == 0 {
                    average.fg(Color::Yellow)
                } else {
                    average
                },
                Cell::new(observed),
            ]);
        }
        output.push_str(&weekdays.to_string());
        output.push('\n');

        let mut hourly = Table::new();
        hourly.load_preset(UTF8_FULL);
        hourly.set_header(header(&["Hour", "Share", "Hour", "Share"]));
        for hour in 0..12 {
            hourly.add_row(vec![
                Cell::new(format!("{hour:02}:00")),
                Cell::new(format!("{:.2}%", report.hourly_profile.share(hour) * 100.0)),
                Cell::new(format!("{:02}:00", hour + 12)),
                Cell::new(format!(
                    "{:.2}%",
                    report.hourly_profile.share(hour + 12) * 100.0
                )),
            ]);
        }
        output.push_str(&hourly.to_string());
        output.push('\n');

        let stats = &report.statistics;
        output.push_str(&format!(
            "Days: {} | Mean: {:.2} kWh | Std dev: {:.2} kWh\n",
            stats.day_count, stats.mean_kwh, stats.std_dev_kwh
        ));
        output.push_str(&format!("Personal trend: {:.3}", report.trend.factor));
        if let (Some(recent), Some(previous)) =
            (report.trend.recent_avg_kwh, report.trend.previous_avg_kwh)
        {
            output.push_str(&format!(" ({recent:.2} vs {previous:.2} kWh/day)"));
        }
        output.push('\n');
        if let Some(advisory) = &report.trend.advisory {
            output.push_str(&format!("  - {advisory}\n"));
        }
        if report.tariff_mismatches > 0 {
            output.push_str(&format!(
                "  - {} reading(s) report a rate different from the fixed tariff\n",
                report.tariff_mismatches
            ));
        }

        output
    }
}

#[derive(Serialize)]
struct DayRow<'a> {
    date: String,
    label: &'a str,
    predicted_kwh: f64,
    lower_kwh: f64,
    upper_kwh: f64,
    peak_kwh: f64,
    off_peak_kwh: f64,
    cost: f64,
    mean_temperature_c: f64,
    apparent_temperature_c: f64,
    humidity_pct: f64,
    precipitation_mm: f64,
    condition: String,
    thermal_factor: f64,
    condition_factor: f64,
    live_weather: bool,
}

#[derive(Serialize)]
struct HourRow<'a> {
    hour: u32,
    label: &'a str,
    kwh: f64,
    cost: f64,
    is_peak: bool,
    temperature_c: Option<f64>,
}

impl CsvFormatter {
    /// One row per horizon day
    pub fn write_days(result: &PredictionResult, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        for day in &result.days {
            writer.serialize(DayRow {
                date: day.date.to_string(),
                label: &day.label,
                predicted_kwh: day.predicted_kwh,
                lower_kwh: day.lower_kwh,
                upper_kwh: day.upper_kwh,
                peak_kwh: day.peak_kwh,
                off_peak_kwh: day.off_peak_kwh,
                cost: day.cost,
                mean_temperature_c: day.mean_temperature_c,
                apparent_temperature_c: day.apparent_temperature_c,
                humidity_pct: day.humidity_pct,
                precipitation_mm: day.precipitation_mm,
                condition: day.condition.to_string(),
                thermal_factor: day.thermal_factor,
                condition_factor: day.condition_factor,
                live_weather: day.used_live_weather,
            })?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Tomorrow's 24 hours
    pub fn write_hourly(result: &PredictionResult, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        for hour in &result.hourly {
            writer.serialize(HourRow {
                hour: hour.hour,
                label: &hour.label,
                kwh: hour.kwh,
                cost: hour.cost,
                is_peak: hour.is_peak,
                temperature_c: hour.temperature_c,
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}
