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

//! Bundled national consumption figures (REN annual reports, 2024-01 .. 2025-01).

use fluxcast_core::national::recent_corrected_average;
use fluxcast_types::{GridMonth, NationalGridSnapshot};

/// (year, month, GWh, YoY %, corrected YoY %)
const STATIC_MONTHS: [(i32, u32, f64, f64, f64); 13] = [
    (2024, 1, 5312.0, 1.8, 1.5),
    (2024, 2, 4890.0, 2.1, 1.9),
    (2024, 3, 4741.0, 1.4, 1.2),
    (2024, 4, 4368.0, 2.3, 2.0),
    (2024, 5, 4422.0, 1.7, 1.6),
    (2024, 6, 4510.0, 2.5, 2.2),
    (2024, 7, 4830.0, 2.9, 2.6),
    (2024, 8, 4760.0, 2.4, 2.1),
    (2024, 9, 4540.0, 1.9, 1.7),
    (2024, 10, 4680.0, 1.6, 1.4),
    (2024, 11, 4990.0, 2.0, 1.8),
    (2024, 12, 5480.0, 1.5, 1.3),
    (2025, 1, 5410.0, 1.8, 1.7),
];

/// Snapshot built from the bundled table
pub fn static_grid_snapshot() -> NationalGridSnapshot {
    let months: Vec<GridMonth> = STATIC_MONTHS
        .iter()
        .map(|&(year, month, gwh, yoy, corrected)| GridMonth {
            year,
            month,
            consumption_gwh: gwh,
            yoy_pct: yoy,
            corrected_yoy_pct: corrected,
        })
        .collect();
    let recent_corrected_pct = recent_corrected_average(&months);

    NationalGridSnapshot {
        months,
        recent_corrected_pct,
    }
}
