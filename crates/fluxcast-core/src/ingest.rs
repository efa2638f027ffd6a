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

//! Parsing of meter history exports.
//!
//! Expected shape:
//! ```json
//! { "clientId": "GE-HACK-2026",
//!   "history": [ { "timestamp": "2026-01-24T00:00:00.000Z", "kwh": 0.61, "cost_rate": 0.1 } ] }
//! ```

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use fluxcast_types::{HistoryDocument, HistoryReading};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Naive timestamp layouts accepted besides RFC 3339
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Upper bound for a single reading; larger values are meter glitches
pub const MAX_READING_KWH: f64 = 1_000_000.0;

/// Errors raised while reading a history export
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid history JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("History export has an empty clientId")]
    EmptyClientId,

    #[error("Record {index}: unparsable timestamp '{value}'")]
    InvalidTimestamp { index: usize, value: String },

    #[error("Record {index}: local time '{value}' does not exist in {timezone}")]
    NonexistentLocalTime {
        index: usize,
        value: String,
        timezone: Tz,
    },

    #[error("Record {index}: kWh must not be negative (got {kwh})")]
    NegativeKwh { index: usize, kwh: f64 },

    #[error("Record {index}: {kwh} kWh exceeds the plausible maximum of 1000000 kWh")]
    ImplausibleKwh { index: usize, kwh: f64 },

    #[error("Record {index}: kWh is not a finite number")]
    NonFiniteKwh { index: usize },

    #[error("Record {index}: cost_rate must be a finite, non-negative number")]
    InvalidCostRate { index: usize },
}

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "clientId", alias = "client_id")]
    client_id: String,
    history: Vec<RawReading>,
}

#[derive(Debug, Deserialize)]
struct RawReading {
    timestamp: String,
    kwh: f64,
    #[serde(default)]
    cost_rate: Option<f64>,
}

/// Parse a history export; naive timestamps are read as wall time in `timezone`
pub fn parse_history(json: &str, timezone: Tz) -> IngestResult<HistoryDocument> {
    let raw: RawDocument = serde_json::from_str(json)?;
    if raw.client_id.trim().is_empty() {
        return Err(IngestError::EmptyClientId);
    }

    let readings = raw
        .history
        .into_iter()
        .enumerate()
        .map(|(index, record)| parse_reading(index, record, timezone))
        .collect::<IngestResult<Vec<_>>>()?;

    Ok(HistoryDocument {
        client_id: raw.client_id,
        readings,
    })
}

/// Read and parse a history export from disk
pub fn load_history_file(path: &Path, timezone: Tz) -> IngestResult<HistoryDocument> {
    let json = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_history(&json, timezone)?;
    info!(
        "✅ Loaded {} readings for client '{}' from {}",
        document.readings.len(),
        document.client_id,
        path.display()
    );
    Ok(document)
}

fn parse_reading(index: usize, record: RawReading, timezone: Tz) -> IngestResult<HistoryReading> {
    if !record.kwh.is_finite() {
        return Err(IngestError::NonFiniteKwh { index });
    }
    if record.kwh < 0.0 {
        return Err(IngestError::NegativeKwh {
            index,
            kwh: record.kwh,
        });
    }
    if record.kwh > MAX_READING_KWH {
        return Err(IngestError::ImplausibleKwh {
            index,
            kwh: record.kwh,
        });
    }
    if record
        .cost_rate
        .is_some_and(|rate| !rate.is_finite() || rate < 0.0)
    {
        return Err(IngestError::InvalidCostRate { index });
    }

    Ok(HistoryReading {
        timestamp: parse_timestamp(index, &record.timestamp, timezone)?,
        kwh: record.kwh,
        cost_rate: record.cost_rate,
    })
}

fn parse_timestamp(index: usize, value: &str, timezone: Tz) -> IngestResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| IngestError::InvalidTimestamp {
            index,
            value: value.to_owned(),
        })?;

    // Earliest mapping on the repeated hour of a DST fall-back
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| IngestError::NonexistentLocalTime {
            index,
            value: value.to_owned(),
            timezone,
        })
}
