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

/// Monthly national consumption with year-over-year change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMonth {
    pub year: i32,
    /// 1 = January
    pub month: u32,
    /// National consumption (GWh)
    pub consumption_gwh: f64,
    /// Raw year-over-year change (%)
    pub yoy_pct: f64,
    /// Year-over-year change corrected for temperature and working days (%)
    pub corrected_yoy_pct: f64,
}

impl GridMonth {
    /// Sortable key, oldest first
    pub fn period_key(&self) -> i64 {
        i64::from(self.year) * 100 + i64::from(self.month)
    }
}

/// National grid demand trend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NationalGridSnapshot {
    /// Monthly records, oldest first
    #[serde(default)]
    pub months: Vec<GridMonth>,
    /// Rolling 3-month average of the corrected YoY change (%)
    #[serde(default)]
    pub recent_corrected_pct: Option<f64>,
}

impl NationalGridSnapshot {
    pub fn latest(&self) -> Option<&GridMonth> {
        self.months.iter().max_by_key(|m| m.period_key())
    }
}
