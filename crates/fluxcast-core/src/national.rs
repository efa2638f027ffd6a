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

use fluxcast_types::{Advisory, GridMonth, NationalGridSnapshot, Sourced};
use tracing::{debug, warn};

/// Months in the rolling national average
pub const RECENT_MONTHS: usize = 3;

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Scalar factor for a YoY percentage, rounded to 4 decimals
pub fn factor_from_pct(pct: f64) -> f64 {
    round_to(1.0 + pct / 100.0, 4).max(0.0)
}

/// Mean corrected YoY change of the latest months with consumption, rounded to 2 decimals
pub fn recent_corrected_average(months: &[GridMonth]) -> Option<f64> {
    let mut valid: Vec<&GridMonth> = months.iter().filter(|m| m.consumption_gwh > 0.0).collect();
    if valid.is_empty() {
        return None;
    }
    valid.sort_by_key(|m| m.period_key());

    let recent = &valid[valid.len().saturating_sub(RECENT_MONTHS)..];
    let avg = recent.iter().map(|m| m.corrected_yoy_pct).sum::<f64>() / recent.len() as f64;
    Some(round_to(avg, 2))
}

/// National factor with provenance, plus an advisory when it had to be neutral
///
/// A snapshot without a precomputed average has it derived from its months.
pub fn resolve_national_factor(
    snapshot: Option<&Sourced<NationalGridSnapshot>>,
) -> (Sourced<f64>, Option<Advisory>) {
    let Some(snapshot) = snapshot else {
        warn!("🌍 [NATIONAL] No national snapshot, using neutral factor");
        return (
            Sourced::fallback(1.0),
            Some(Advisory::NationalTrendUnavailable),
        );
    };

    let pct = snapshot
        .value
        .recent_corrected_pct
        .or_else(|| recent_corrected_average(&snapshot.value.months));

    match pct {
        Some(pct) => {
            let factor = factor_from_pct(pct);
            debug!(
                "🌍 [NATIONAL] Corrected YoY {:+.2}% -> factor {:.4} ({})",
                pct, factor, snapshot.source
            );
            (Sourced::new(factor, snapshot.source), None)
        }
        None => {
            warn!("🌍 [NATIONAL] Snapshot has no usable months, using neutral factor");
            (
                Sourced::fallback(1.0),
                Some(Advisory::NationalTrendUnavailable),
            )
        }
    }
}
