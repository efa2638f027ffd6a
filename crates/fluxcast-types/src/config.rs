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

use serde::{Deserialize, Serialize};

/// Fixed coefficients of the forecasting pipeline
///
/// Nothing here is learned. `ForecastConfig::default()` is the production
/// parameter set; tests construct variants to probe individual factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub tariff: TariffConfig,
    pub thermal: ThermalConfig,
    pub conditions: ConditionConfig,
    pub blend: BlendConfig,
    pub interval: IntervalConfig,
    pub confidence: ConfidenceConfig,
    pub seasonal: SeasonalConfig,
    /// Number of days predicted, starting today
    pub horizon_days: usize,
    /// Days per window in the personal trend ratio
    pub trend_window_days: usize,
    pub devices: Vec<DeviceArchetype>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            tariff: TariffConfig::default(),
            thermal: ThermalConfig::default(),
            conditions: ConditionConfig::default(),
            blend: BlendConfig::default(),
            interval: IntervalConfig::default(),
            confidence: ConfidenceConfig::default(),
            seasonal: SeasonalConfig::default(),
            horizon_days: 7,
            trend_window_days: 7,
            devices: DeviceArchetype::catalog(),
        }
    }
}

// === Tariff ===

/// Two-band time-of-use tariff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffConfig {
    /// Rate for hours before `peak_start_hour` (per kWh)
    pub off_peak_rate: f64,
    /// Rate from `peak_start_hour` to midnight (per kWh)
    pub peak_rate: f64,
    pub peak_start_hour: u32,
}

impl TariffConfig {
    pub fn is_peak(&self, hour: u32) -> bool {
        hour >= self.peak_start_hour
    }

    pub fn rate_for_hour(&self, hour: u32) -> f64 {
        if self.is_peak(hour) {
            self.peak_rate
        } else {
            self.off_peak_rate
        }
    }
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            off_peak_rate: 0.10,
            peak_rate: 0.22,
            peak_start_hour: 8,
        }
    }
}

// === Weather ===

/// Heating/cooling load grows linearly with distance from the comfort point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalConfig {
    pub comfort_temperature_c: f64,
    /// Factor increase per °C away from comfort
    pub coefficient_per_degree: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            comfort_temperature_c: 18.0,
            coefficient_per_degree: 0.02,
        }
    }
}

/// Precipitation and humidity ladder, first match wins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionConfig {
    pub storm_precipitation_mm: f64,
    pub storm_factor: f64,
    pub heavy_rain_precipitation_mm: f64,
    pub heavy_rain_factor: f64,
    pub rain_precipitation_mm: f64,
    pub rain_factor: f64,
    pub humid_threshold_pct: f64,
    pub humid_factor: f64,
    pub base_factor: f64,
}

impl Default for ConditionConfig {
    fn default() -> Self {
        Self {
            storm_precipitation_mm: 15.0,
            storm_factor: 1.08,
            heavy_rain_precipitation_mm: 5.0,
            heavy_rain_factor: 1.05,
            rain_precipitation_mm: 1.0,
            rain_factor: 1.03,
            humid_threshold_pct: 80.0,
            humid_factor: 1.02,
            base_factor: 1.00,
        }
    }
}

/// Climatology used for days the weather snapshot does not cover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalConfig {
    /// Typical temperature per month (°C). Index 0 = January
    pub monthly_temperature_c: [f64; 12],
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
}

impl SeasonalConfig {
    /// Temperature for a 1-based month
    pub fn temperature_for_month(&self, month: u32) -> f64 {
        let idx = month.saturating_sub(1) as usize % 12;
        self.monthly_temperature_c[idx]
    }
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            monthly_temperature_c: [
                11.0, 12.0, 14.0, 16.0, 19.0, 23.0, 27.0, 27.0, 24.0, 20.0, 15.0, 12.0,
            ],
            humidity_pct: 60.0,
            precipitation_mm: 0.0,
        }
    }
}

// === Disaggregation and confidence ===

/// Weights of the historical profile and the thermal profile in hourly shares
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendConfig {
    pub historical_weight: f64,
    pub thermal_weight: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            historical_weight: 0.7,
            thermal_weight: 0.3,
        }
    }
}

/// Prediction band half-width as a multiple of the daily std-dev
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalConfig {
    pub std_dev_multiplier: f64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            std_dev_multiplier: 0.8,
        }
    }
}

/// Horizon-wide confidence, penalised by how far the trend is from neutral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    pub base_pct: f64,
    /// Percentage points lost per unit of |trend - 1|
    pub trend_penalty: f64,
    pub min_pct: f64,
    pub max_pct: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base_pct: 95.0,
            trend_penalty: 100.0,
            min_pct: 60.0,
            max_pct: 95.0,
        }
    }
}

// === Devices ===

/// Household appliance archetype used to apportion a day's consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceArchetype {
    pub name: String,
    pub nominal_watts: f64,
    /// Assumed hours of use per day
    pub daily_hours: f64,
    /// Display colour (hex)
    pub color: String,
}

impl DeviceArchetype {
    pub fn new(name: &str, nominal_watts: f64, daily_hours: f64, color: &str) -> Self {
        Self {
            name: name.to_owned(),
            nominal_watts,
            daily_hours,
            color: color.to_owned(),
        }
    }

    /// Nominal daily energy (kWh), used as the apportioning weight
    pub fn weight_kwh(&self) -> f64 {
        self.nominal_watts / 1000.0 * self.daily_hours
    }

    pub fn catalog() -> Vec<Self> {
        vec![
            Self::new("Air conditioner", 1200.0, 4.0, "#3b82f6"),
            Self::new("Water heater", 2000.0, 1.5, "#ef4444"),
            Self::new("Refrigerator", 150.0, 24.0, "#10b981"),
            Self::new("Washing machine", 2000.0, 0.75, "#8b5cf6"),
            Self::new("Oven & cooking", 2000.0, 0.75, "#f97316"),
            Self::new("Lighting", 300.0, 5.0, "#eab308"),
            Self::new("Desktop PC", 250.0, 6.0, "#06b6d4"),
            Self::new("Standby loads", 50.0, 24.0, "#64748b"),
        ]
    }
}
