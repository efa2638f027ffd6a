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

mod validation;

pub use validation::{ValidationIssue, ValidationResult};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use fluxcast_types::GeoLocation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Config files probed in the working directory, in order
const DEFAULT_TOML_PATH: &str = "fluxcast.toml";
const DEFAULT_JSON_PATH: &str = "fluxcast.json";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Open-Meteo accepts at most 16 forecast days and 92 past days
const MAX_FORECAST_DAYS: u32 = 16;
const MAX_PAST_DAYS: u32 = 92;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown timezone '{0}'")]
    Timezone(String),
}

/// Application configuration for the `fluxcast` binary
///
/// Forecast constants (tariff, factors, device catalog) are fixed and live in
/// [`fluxcast_types::ForecastConfig`]; this only covers where data comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub system: SystemConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub national: NationalConfig,
}

/// Household location used for the weather lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// IANA zone used to assign readings to calendar days
    ///
    /// Weather hours are requested in this zone too, so it should be the zone
    /// of `location`; a distant location gets its daytime averages shifted.
    pub timezone: String,
    /// Fallback log filter when RUST_LOG is unset
    pub log_level: String,
    /// Currency label printed next to costs
    pub display_currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Default history export, overridden by `--history`
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub base_url: String,
    pub past_days: u32,
    pub forecast_days: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        let lisbon = GeoLocation::default();
        Self {
            latitude: lisbon.latitude,
            longitude: lisbon.longitude,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Lisbon".to_string(),
            log_level: "info".to_string(),
            display_currency: "EUR".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: fluxcast_adapters::open_meteo::DEFAULT_BASE_URL.to_string(),
            past_days: 5,
            forecast_days: 7,
            timeout_secs: 10,
        }
    }
}

impl Default for NationalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: fluxcast_adapters::ren::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl NationalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// Order: explicit `--config` path, `fluxcast.toml`, `fluxcast.json`, then
    /// defaults with `FLUXCAST_*` environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            info!("✅ Loaded configuration from {}", path.display());
            config.validate()?;
            return Ok(config);
        }

        for candidate in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let path = Path::new(candidate);
            if path.exists() {
                let config = Self::from_file(path)?;
                info!("✅ Loaded configuration from {}", candidate);
                config.validate()?;
                return Ok(config);
            }
        }

        warn!("No configuration file found, using defaults with environment overrides");
        let config = Self::from_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file, JSON when the extension says so and TOML otherwise
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Defaults with `FLUXCAST_*` environment overrides
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(lat) = lookup("FLUXCAST_LATITUDE")
            && let Ok(value) = lat.parse::<f64>()
        {
            config.location.latitude = value;
        }
        if let Some(lon) = lookup("FLUXCAST_LONGITUDE")
            && let Ok(value) = lon.parse::<f64>()
        {
            config.location.longitude = value;
        }
        if let Some(tz) = lookup("FLUXCAST_TIMEZONE") {
            config.system.timezone = tz;
        }
        if let Some(path) = lookup("FLUXCAST_HISTORY") {
            config.history.path = Some(path);
        }
        if let Some(level) = lookup("FLUXCAST_LOG_LEVEL") {
            config.system.log_level = level;
        }

        config
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.system
            .timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Timezone(self.system.timezone.clone()))
    }

    pub fn geo_location(&self) -> GeoLocation {
        GeoLocation {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
        }
    }

    /// Validate configuration with detailed error reporting
    pub fn validate_detailed(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        // === Location ===
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            result.add_error("location.latitude", "Must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            result.add_error("location.longitude", "Must be between -180 and 180");
        }

        // === System ===
        if self.timezone().is_err() {
            result.add_error(
                "system.timezone",
                format!("Unknown IANA timezone '{}'", self.system.timezone),
            );
        }
        if !LOG_LEVELS.contains(&self.system.log_level.to_lowercase().as_str()) {
            result.add_warning(
                "system.log_level",
                format!(
                    "'{}' is not a plain level, it will be used as a filter directive",
                    self.system.log_level
                ),
            );
        }
        if self.system.display_currency.trim().is_empty() {
            result.add_warning("system.display_currency", "Costs will print without a currency");
        }

        // === Weather ===
        if self.weather.enabled {
            check_base_url(&mut result, "weather.base_url", &self.weather.base_url);
            check_timeout(&mut result, "weather.timeout_secs", self.weather.timeout_secs);

            if self.weather.forecast_days == 0 || self.weather.forecast_days > MAX_FORECAST_DAYS {
                result.add_error(
                    "weather.forecast_days",
                    format!("Must be between 1 and {MAX_FORECAST_DAYS}"),
                );
            } else if self.weather.forecast_days < 7 {
                result.add_warning(
                    "weather.forecast_days",
                    "Days beyond the forecast window use seasonal averages",
                );
            }
            if self.weather.past_days > MAX_PAST_DAYS {
                result.add_error(
                    "weather.past_days",
                    format!("Must be at most {MAX_PAST_DAYS}"),
                );
            }
        }

        // === National grid ===
        if self.national.enabled {
            check_base_url(&mut result, "national.base_url", &self.national.base_url);
            check_timeout(&mut result, "national.timeout_secs", self.national.timeout_secs);
        }

        result
    }

    /// Validate configuration, folding all errors into one
    pub fn validate(&self) -> Result<()> {
        let result = self.validate_detailed();
        for warning in &result.warnings {
            warn!("⚠️ Config {}", warning);
        }
        if !result.valid {
            anyhow::bail!("Invalid configuration:\n{}", result.error_summary());
        }
        Ok(())
    }

    /// Timezone after validation
    pub fn resolved_timezone(&self) -> Result<Tz> {
        self.timezone().context("Configured timezone is not valid")
    }
}

fn check_base_url(result: &mut ValidationResult, field: &str, url: &str) {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        result.add_error(field, format!("'{url}' must start with http:// or https://"));
    }
}

fn check_timeout(result: &mut ValidationResult, field: &str, secs: u64) {
    if secs == 0 {
        result.add_error(field, "Must be at least 1 second");
    } else if secs > 60 {
        result.add_warning(field, format!("Value is very high ({secs}s), consider reducing"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.system.timezone, "Europe/Lisbon");
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Lisbon);
        assert!((config.location.latitude - 38.7223).abs() < 1e-9);
        assert!(config.weather.enabled);
        assert_eq!(config.weather.forecast_days, 7);
        assert!(config.history.path.is_none());

        // Validation should pass on default
        assert!(config.validate().is_ok());
        assert!(config.validate_detailed().warnings.is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FLUXCAST_LATITUDE", "41.15"),
            ("FLUXCAST_LONGITUDE", "not-a-number"),
            ("FLUXCAST_TIMEZONE", "Europe/Madrid"),
            ("FLUXCAST_HISTORY", "raw_history.json"),
            ("FLUXCAST_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()));

        assert!((config.location.latitude - 41.15).abs() < 1e-9);
        // Unparsable values keep the default
        assert!((config.location.longitude - -9.1393).abs() < 1e-9);
        assert_eq!(config.system.timezone, "Europe/Madrid");
        assert_eq!(config.history.path.as_deref(), Some("raw_history.json"));
        assert_eq!(config.system.log_level, "debug");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = AppConfig::default();
        config.location.latitude = 120.0;
        config.system.timezone = "Mars/Olympus".to_string();
        config.weather.forecast_days = 30;
        config.national.timeout_secs = 0;

        let result = config.validate_detailed();
        assert!(!result.valid);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "location.latitude",
                "system.timezone",
                "weather.forecast_days",
                "national.timeout_secs"
            ]
        );

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Mars/Olympus"));
    }

    #[test]
    fn test_disabled_sources_skip_checks() {
        let mut config = AppConfig::default();
        config.weather.enabled = false;
        config.weather.base_url = String::new();
        config.national.enabled = false;
        config.national.timeout_secs = 0;

        assert!(config.validate_detailed().valid);
    }

    #[test]
    fn test_short_forecast_window_warns() {
        let mut config = AppConfig::default();
        config.weather.forecast_days = 3;

        let result = config.validate_detailed();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].field, "weather.forecast_days");
    }

    #[test]
    fn test_from_toml_file_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[location]
latitude = 41.1579
longitude = -8.6291

[history]
path = "porto.json"

[weather]
enabled = false
base_url = "http://localhost:8080"
past_days = 2
forecast_days = 7
timeout_secs = 5
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert!((config.location.latitude - 41.1579).abs() < 1e-9);
        assert_eq!(config.history.path.as_deref(), Some("porto.json"));
        assert!(!config.weather.enabled);
        // Missing sections fall back to defaults
        assert_eq!(config.system, SystemConfig::default());
        assert_eq!(config.national, NationalConfig::default());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"system": {{"timezone": "Atlantic/Azores", "log_level": "warn", "display_currency": "EUR"}}}}"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timezone().unwrap(), chrono_tz::Atlantic::Azores);
    }

    #[test]
    fn test_from_file_errors() {
        let missing = AppConfig::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[location\nlatitude = ").unwrap();
        let broken = AppConfig::from_file(file.path());
        assert!(matches!(broken, Err(ConfigError::Toml { .. })));
    }
}
