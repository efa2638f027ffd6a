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

//! Synthetic hourly history in the export format.

use anyhow::Result;
use chrono::{Days, NaiveDate, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use fluxcast_core::national::round_to;
use fluxcast_types::{HistoryDocument, HistoryReading, TariffConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Generation parameters
#[derive(Debug, Clone)]
pub struct SyntheticHistoryConfig {
    pub client_id: String,
    pub start: NaiveDate,
    pub days: u32,
    pub seed: Option<u64>,
    pub timezone: Tz,
}

impl Default for SyntheticHistoryConfig {
    fn default() -> Self {
        Self {
            client_id: "GE-HACK-2026".to_string(),
            start: NaiveDate::from_ymd_opt(2026, 1, 24).unwrap_or_default(),
            days: 30,
            seed: None,
            timezone: chrono_tz::Europe::Lisbon,
        }
    }
}

// === Load shape ===

/// Evening hours with the higher base load (inclusive)
const EVENING_PEAK: std::ops::RangeInclusive<u32> = 19..=22;
const EVENING_BASE_KWH: f64 = 1.8;
const BASE_KWH: f64 = 0.5;
/// Upper bound (exclusive) of the uniform noise added to every hour
const NOISE_KWH: f64 = 0.7;

#[derive(Debug)]
pub struct SyntheticHistoryGenerator;

impl SyntheticHistoryGenerator {
    /// Hourly readings at local wall-clock hours
    ///
    /// Hours that do not exist locally (spring-forward gap) are skipped.
    pub fn generate(config: &SyntheticHistoryConfig) -> HistoryDocument {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let tariff = TariffConfig::default();

        let mut readings = Vec::with_capacity(config.days as usize * 24);
        for offset in 0..config.days {
            let Some(date) = config.start.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            for hour in 0..24 {
                let Some(local) = date
                    .and_hms_opt(hour, 0, 0)
                    .and_then(|naive| config.timezone.from_local_datetime(&naive).earliest())
                else {
                    continue;
                };

                let base = if EVENING_PEAK.contains(&hour) {
                    EVENING_BASE_KWH
                } else {
                    BASE_KWH
                };
                let kwh = round_to(base + rng.gen_range(0.0..NOISE_KWH), 2);

                readings.push(HistoryReading {
                    timestamp: local.with_timezone(&Utc),
                    kwh,
                    cost_rate: Some(tariff.rate_for_hour(hour)),
                });
            }
        }

        HistoryDocument {
            client_id: config.client_id.clone(),
            readings,
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    #[serde(rename = "clientId")]
    client_id: &'a str,
    history: Vec<ExportReading>,
}

#[derive(Serialize)]
struct ExportReading {
    timestamp: String,
    kwh: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_rate: Option<f64>,
}

/// Pretty JSON in the meter export layout (`clientId` + `history`)
pub fn to_export_json(document: &HistoryDocument) -> Result<String> {
    let export = ExportDocument {
        client_id: &document.client_id,
        history: document
            .readings
            .iter()
            .map(|r| ExportReading {
                timestamp: r.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                kwh: r.kwh,
                cost_rate: r.cost_rate,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}
