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

//! Command handlers behind the `fluxcast` binary.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use fluxcast_adapters::{OpenMeteoClient, RenGridClient, static_grid_snapshot};
use fluxcast_core::{
    NationalGridDataSource, PredictionInput, WeatherDataSource, predict, profile_history,
};
use fluxcast_types::{
    ForecastConfig, GeoLocation, NationalGridSnapshot, PredictionResult, Sourced, WeatherSnapshot,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::{
    CsvFormatter, DataLoader, GenerateArgs, HistoryLoader, NationalJsonLoader, PredictArgs,
    ProfileArgs, SyntheticLoader, TableFormatter, WeatherJsonLoader,
};
use crate::config::AppConfig;
use crate::synthetic::{SyntheticHistoryConfig, to_export_json};

/// Weather and national inputs for one run
#[derive(Debug, Default)]
pub struct Collaborators {
    pub weather: Option<Sourced<WeatherSnapshot>>,
    pub national: Option<Sourced<NationalGridSnapshot>>,
}

/// `--as-of`, or today in the configured timezone
pub fn resolve_as_of(arg: Option<&str>, timezone: Tz) -> Result<NaiveDate> {
    match arg {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD")),
        None => Ok(Utc::now().with_timezone(&timezone).date_naive()),
    }
}

/// `--history`, or `history.path` from the config
pub fn history_path(arg: Option<&str>, config: &AppConfig) -> Result<PathBuf> {
    arg.or(config.history.path.as_deref())
        .map(PathBuf::from)
        .context("No history export given, pass --history or set history.path")
}

/// Ask a weather source, degrading to `None` on failure
pub async fn fetch_weather(
    source: &dyn WeatherDataSource,
    location: GeoLocation,
    today: NaiveDate,
) -> Option<Sourced<WeatherSnapshot>> {
    match source.fetch_snapshot(location, today).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(
                "⚠️ [{}] Weather unavailable ({:#}), using seasonal averages",
                source.name(),
                e
            );
            None
        }
    }
}

/// Ask a national grid source, degrading to `None` on failure
pub async fn fetch_national(
    source: &dyn NationalGridDataSource,
    today: NaiveDate,
) -> Option<Sourced<NationalGridSnapshot>> {
    match source.fetch_snapshot(today).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("⚠️ [{}] National trend unavailable ({:#})", source.name(), e);
            None
        }
    }
}

/// Pick snapshot files, live sources or offline fallbacks for a run
///
/// Snapshot files win over everything and a broken file is an error. Offline
/// runs get no weather and the bundled national table.
pub async fn resolve_collaborators(
    config: &AppConfig,
    args: &PredictArgs,
    today: NaiveDate,
) -> Result<Collaborators> {
    let weather = if let Some(path) = &args.weather_json {
        Some(WeatherJsonLoader::new(path).load()?)
    } else if args.offline || !config.weather.enabled {
        None
    } else {
        let client = OpenMeteoClient::new(&config.weather.base_url, config.weather.timeout())?
            .with_window(config.weather.past_days, config.weather.forecast_days)
            .with_timezone(&config.system.timezone);
        fetch_weather(&client, config.geo_location(), today).await
    };

    let national = if let Some(path) = &args.national_json {
        Some(NationalJsonLoader::new(path).load()?)
    } else if !config.national.enabled {
        None
    } else if args.offline {
        Some(Sourced::fallback(static_grid_snapshot()))
    } else {
        let client = RenGridClient::new(&config.national.base_url, config.national.timeout())?;
        fetch_national(&client, today).await
    };

    Ok(Collaborators { weather, national })
}

/// Forecast from the history export and print it
pub async fn run_predict(config: &AppConfig, args: &PredictArgs) -> Result<()> {
    let timezone = config.resolved_timezone()?;
    let as_of = resolve_as_of(args.as_of.as_deref(), timezone)?;
    let history = HistoryLoader::new(history_path(args.history.as_deref(), config)?, timezone)
        .load()?;
    let collaborators = resolve_collaborators(config, args, as_of).await?;

    let input = PredictionInput {
        history: &history.readings,
        as_of,
        timezone,
        weather: collaborators.weather.as_ref(),
        national: collaborators.national.as_ref(),
    };
    let result = predict(&input, &ForecastConfig::default());
    info!(
        "✅ Forecast for client '{}' as of {} ({} advisories)",
        history.client_id,
        as_of,
        result.advisories.len()
    );

    print!(
        "{}",
        render_prediction(&result, args, &config.system.display_currency)?
    );
    Ok(())
}

/// Text for stdout; CSV files are written as a side effect
pub fn render_prediction(
    result: &PredictionResult,
    args: &PredictArgs,
    currency: &str,
) -> Result<String> {
    let mut output = String::new();

    if args.output == "json" {
        output.push_str(&serde_json::to_string_pretty(result)?);
        output.push('\n');
        return Ok(output);
    }

    if matches!(args.output.as_str(), "table" | "both") {
        output.push_str(&TableFormatter::format_prediction(result, currency));
        if args.hourly {
            output.push_str(&TableFormatter::format_hourly(result, currency));
        }
        if args.devices {
            output.push_str(&TableFormatter::format_devices(result));
        }
    }

    if matches!(args.output.as_str(), "csv" | "both") {
        let path = args
            .csv_path
            .as_deref()
            .map(Path::new)
            .context("--csv-path is required when --output is csv or both")?;
        CsvFormatter::write_days(result, path)?;
        output.push_str(&format!("Daily forecast written to {}\n", path.display()));

        if args.hourly {
            let hourly_path = hourly_csv_path(path);
            CsvFormatter::write_hourly(result, &hourly_path)?;
            output.push_str(&format!("Hourly forecast written to {}\n", hourly_path.display()));
        }
    }

    Ok(output)
}

/// `forecast.csv` -> `forecast_hourly.csv`
pub fn hourly_csv_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "forecast".into(), |s| s.to_string_lossy());
    path.with_file_name(format!("{stem}_hourly.csv"))
}

/// Print the learned profiles of a history export
pub fn run_profile(config: &AppConfig, args: &ProfileArgs) -> Result<()> {
    let timezone = config.resolved_timezone()?;
    let history = HistoryLoader::new(history_path(args.history.as_deref(), config)?, timezone)
        .load()?;
    let report = profile_history(&history.readings, timezone, &ForecastConfig::default());

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", TableFormatter::format_profile(&report));
    }
    Ok(())
}

/// Write a synthetic export to `--out` or stdout
pub fn run_generate(config: &AppConfig, args: &GenerateArgs) -> Result<()> {
    let start = NaiveDate::parse_from_str(&args.start, "%Y-%m-%d")
        .with_context(|| format!("Invalid start date '{}', expected YYYY-MM-DD", args.start))?;
    let loader = SyntheticLoader {
        config: SyntheticHistoryConfig {
            client_id: args.client_id.clone(),
            start,
            days: args.days,
            seed: args.seed,
            timezone: config.resolved_timezone()?,
        },
    };
    let json = to_export_json(&loader.load()?)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {path}"))?;
            info!("✅ Synthetic history written to {}", path);
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticHistoryGenerator;
    use fluxcast_types::{Advisory, SourceKind};

    fn predict_args() -> PredictArgs {
        PredictArgs {
            history: None,
            as_of: Some("2026-02-23".to_string()),
            weather_json: None,
            national_json: None,
            offline: true,
            output: "table".to_string(),
            csv_path: None,
            hourly: false,
            devices: false,
        }
    }

    fn write_history(dir: &Path) -> PathBuf {
        let doc = SyntheticHistoryGenerator::generate(&SyntheticHistoryConfig {
            seed: Some(11),
            ..Default::default()
        });
        let path = dir.join("raw_history.json");
        std::fs::write(&path, to_export_json(&doc).unwrap()).unwrap();
        path
    }

    fn offline_result(history: &Path) -> PredictionResult {
        let config = AppConfig::default();
        let tz = config.resolved_timezone().unwrap();
        let doc = HistoryLoader::new(history, tz).load().unwrap();
        let national = Sourced::fallback(static_grid_snapshot());
        let input = PredictionInput {
            history: &doc.readings,
            as_of: NaiveDate::from_ymd_opt(2026, 2, 23).unwrap(),
            timezone: tz,
            weather: None,
            national: Some(&national),
        };
        predict(&input, &ForecastConfig::default())
    }

    #[test]
    fn test_resolve_as_of() {
        let tz = chrono_tz::Europe::Lisbon;
        assert_eq!(
            resolve_as_of(Some("2026-02-23"), tz).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 23).unwrap()
        );
        assert!(resolve_as_of(Some("23/02/2026"), tz).is_err());
        assert!(resolve_as_of(None, tz).is_ok());
    }

    #[test]
    fn test_history_path_precedence() {
        let mut config = AppConfig::default();
        assert!(history_path(None, &config).is_err());

        config.history.path = Some("from_config.json".to_string());
        assert_eq!(
            history_path(None, &config).unwrap(),
            PathBuf::from("from_config.json")
        );
        assert_eq!(
            history_path(Some("cli.json"), &config).unwrap(),
            PathBuf::from("cli.json")
        );
    }

    #[test]
    fn test_hourly_csv_path() {
        assert_eq!(
            hourly_csv_path(Path::new("/tmp/out/forecast.csv")),
            PathBuf::from("/tmp/out/forecast_hourly.csv")
        );
    }

    #[tokio::test]
    async fn test_offline_collaborators() {
        let config = AppConfig::default();
        let today = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        let collaborators = resolve_collaborators(&config, &predict_args(), today)
            .await
            .unwrap();

        assert!(collaborators.weather.is_none());
        let national = collaborators.national.unwrap();
        assert_eq!(national.source, SourceKind::Fallback);
    }

    #[tokio::test]
    async fn test_disabled_national_source() {
        let mut config = AppConfig::default();
        config.national.enabled = false;
        let today = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        let collaborators = resolve_collaborators(&config, &predict_args(), today)
            .await
            .unwrap();
        assert!(collaborators.national.is_none());
    }

    #[tokio::test]
    async fn test_broken_snapshot_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.json");
        std::fs::write(&path, "{").unwrap();

        let mut args = predict_args();
        args.weather_json = Some(path.to_string_lossy().into_owned());
        let today = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        assert!(
            resolve_collaborators(&AppConfig::default(), &args, today)
                .await
                .is_err()
        );
    }

    #[test]
    fn test_offline_forecast_table_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let result = offline_result(&write_history(dir.path()));

        assert_eq!(result.days.len(), 7);
        assert!(result.advisories.contains(&Advisory::WeatherUnavailable));
        assert!((result.national_factor.value - 1.016).abs() < 1e-9);

        let csv_path = dir.path().join("forecast.csv");
        let mut args = predict_args();
        args.output = "both".to_string();
        args.csv_path = Some(csv_path.to_string_lossy().into_owned());
        args.hourly = true;
        args.devices = true;

        let text = render_prediction(&result, &args, "EUR").unwrap();
        assert!(text.contains("(tomorrow)"));
        assert!(text.contains("Tomorrow by hour"));
        assert!(text.contains("Refrigerator"));

        let days = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(days.lines().count(), 8);
        assert!(days.starts_with("date,label,predicted_kwh"));
        let hours = std::fs::read_to_string(dir.path().join("forecast_hourly.csv")).unwrap();
        assert_eq!(hours.lines().count(), 25);
    }

    #[test]
    fn test_csv_output_requires_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = offline_result(&write_history(dir.path()));
        let mut args = predict_args();
        args.output = "csv".to_string();
        assert!(render_prediction(&result, &args, "EUR").is_err());
    }

    #[test]
    fn test_json_output_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let result = offline_result(&write_history(dir.path()));
        let mut args = predict_args();
        args.output = "json".to_string();

        let text = render_prediction(&result, &args, "EUR").unwrap();
        let parsed: PredictionResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.days.len(), 7);
        assert_eq!(parsed.hourly.len(), 24);
    }

    #[test]
    fn test_generate_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gen.json");
        let args = GenerateArgs {
            days: 2,
            start: "2026-01-24".to_string(),
            client_id: "TEST-1".to_string(),
            seed: Some(5),
            out: Some(out.to_string_lossy().into_owned()),
        };
        run_generate(&AppConfig::default(), &args).unwrap();

        let doc = HistoryLoader::new(&out, chrono_tz::Europe::Lisbon)
            .load()
            .unwrap();
        assert_eq!(doc.client_id, "TEST-1");
        assert_eq!(doc.readings.len(), 48);
    }
}
