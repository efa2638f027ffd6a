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

//! Collaborator interfaces. Implementations live in `fluxcast-adapters`.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use fluxcast_types::{GeoLocation, NationalGridSnapshot, Sourced, WeatherSnapshot};

/// Trait for fetching weather observations and forecasts
#[async_trait]
pub trait WeatherDataSource: Send + Sync {
    /// Fetch past days and the forecast around `today` for a location
    async fn fetch_snapshot(
        &self,
        location: GeoLocation,
        today: NaiveDate,
    ) -> Result<Sourced<WeatherSnapshot>>;

    /// Get data source name for logging
    fn name(&self) -> &str;
}

/// Trait for fetching the national consumption trend
#[async_trait]
pub trait NationalGridDataSource: Send + Sync {
    /// Fetch monthly national consumption up to `today`
    ///
    /// Implementations may answer with bundled data, tagged as a fallback.
    async fn fetch_snapshot(&self, today: NaiveDate) -> Result<Sourced<NationalGridSnapshot>>;

    /// Get data source name for logging
    fn name(&self) -> &str;
}
