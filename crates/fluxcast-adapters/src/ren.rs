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

//! REN Datahub client for Portuguese national electricity consumption.

use crate::errors::AdapterResult;
use crate::fallback::static_grid_snapshot;
use crate::http::JsonHttpClient;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use fluxcast_core::national::recent_corrected_average;
use fluxcast_core::traits::NationalGridDataSource;
use fluxcast_types::{GridMonth, NationalGridSnapshot, Sourced};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const SERVICE: &str = "REN Datahub";

/// Public REN Datahub endpoint
pub const DEFAULT_BASE_URL: &str = "https://servicebus.ren.pt/datahubapi";

/// One monthly row of the yearly variation report
///
/// Months not yet published come back with null values.
#[derive(Debug, Deserialize)]
struct RenRow {
    /// English month name, other row kinds are ignored
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    consumption: Option<f64>,
    #[serde(rename = "yearEvol", default)]
    year_evol: Option<f64>,
    #[serde(rename = "yearEvolCTWD", default)]
    year_evol_corrected: Option<f64>,
}

/// 1-based month for an English month name
pub fn month_from_name(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
}

/// National grid collaborator backed by the REN Datahub API
#[derive(Debug, Clone)]
pub struct RenGridClient {
    base_url: String,
    http: JsonHttpClient,
}

impl RenGridClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AdapterResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            http: JsonHttpClient::new(timeout)?,
        })
    }

    #[must_use]
    pub fn with_http(mut self, http: JsonHttpClient) -> Self {
        self.http = http;
        self
    }

    /// Monthly rows of one calendar year with published consumption
    pub async fn get_year(&self, year: i32) -> AdapterResult<Vec<GridMonth>> {
        let url = format!(
            "{}/electricity/ElectricityConsumptionVariationYearly",
            self.base_url.trim_end_matches('/')
        );
        let query = [("culture", "en-US".to_owned()), ("year", year.to_string())];
        let rows: Vec<RenRow> = self.http.get_json(SERVICE, &url, &query).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let consumption = row.consumption.filter(|c| *c > 0.0)?;
                let corrected = row.year_evol_corrected?;
                month_from_name(&row.kind).map(|month| GridMonth {
                    year,
                    month,
                    consumption_gwh: consumption,
                    yoy_pct: row.year_evol.unwrap_or(0.0),
                    corrected_yoy_pct: corrected,
                })
            })
            .collect())
    }

    /// Last year and the current year, oldest month first
    pub async fn get_snapshot(&self, today: NaiveDate) -> AdapterResult<NationalGridSnapshot> {
        let year = today.year();
        let (previous, current) = tokio::try_join!(self.get_year(year - 1), self.get_year(year))?;

        let mut months: Vec<GridMonth> = previous.into_iter().chain(current).collect();
        months.sort_by_key(GridMonth::period_key);
        let recent_corrected_pct = recent_corrected_average(&months);

        info!(
            "✅ [{}] {} months, recent corrected YoY {:?}%",
            SERVICE,
            months.len(),
            recent_corrected_pct
        );

        Ok(NationalGridSnapshot {
            months,
            recent_corrected_pct,
        })
    }
}

#[async_trait]
impl NationalGridDataSource for RenGridClient {
    /// Live data, or the bundled table when REN cannot be reached
    async fn fetch_snapshot(&self, today: NaiveDate) -> anyhow::Result<Sourced<NationalGridSnapshot>> {
        match self.get_snapshot(today).await {
            Ok(snapshot) if !snapshot.months.is_empty() => Ok(Sourced::live(snapshot)),
            Ok(_) => {
                warn!("⚠️ [{}] No published months, using bundled data", SERVICE);
                Ok(Sourced::fallback(static_grid_snapshot()))
            }
            Err(e) => {
                warn!("⚠️ [{}] Fetch failed ({}), using bundled data", SERVICE, e);
                Ok(Sourced::fallback(static_grid_snapshot()))
            }
        }
    }

    fn name(&self) -> &str {
        SERVICE
    }
}
