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

use fluxcast_types::Advisory;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Personal behavioural trend: recent week against the week before
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEstimate {
    /// Multiplier applied to every predicted day. Not clamped.
    pub factor: f64,
    pub recent_avg_kwh: Option<f64>,
    pub previous_avg_kwh: Option<f64>,
    /// Set when the neutral trend was used as a fallback
    pub advisory: Option<Advisory>,
}

impl TrendEstimate {
    fn neutral(advisory: Advisory) -> Self {
        Self {
            factor: 1.0,
            recent_avg_kwh: None,
            previous_avg_kwh: None,
            advisory: Some(advisory),
        }
    }
}

/// Ratio of the average of the last `window` daily totals to the `window` before them
///
/// `daily_totals` must be ordered oldest first. Fewer than two full windows
/// give exactly 1.0.
pub fn estimate_trend(daily_totals: &[f64], window: usize) -> TrendEstimate {
    let days = daily_totals.len();
    if window == 0 || days < window * 2 {
        debug!(
            "📈 [TREND] {} day(s) of history, need {} for a trend",
            days,
            window * 2
        );
        return TrendEstimate::neutral(Advisory::InsufficientTrendHistory { days });
    }

    let recent = &daily_totals[days - window..];
    let previous = &daily_totals[days - 2 * window..days - window];
    let recent_avg = recent.iter().sum::<f64>() / window as f64;
    let previous_avg = previous.iter().sum::<f64>() / window as f64;

    if previous_avg <= 0.0 {
        warn!("📈 [TREND] Previous window has no consumption, holding trend at 1.0");
        return TrendEstimate {
            recent_avg_kwh: Some(recent_avg),
            previous_avg_kwh: Some(previous_avg),
            ..TrendEstimate::neutral(Advisory::ZeroBaselineTrend)
        };
    }

    let factor = recent_avg / previous_avg;
    debug!(
        "📈 [TREND] recent avg {:.3} kWh / previous avg {:.3} kWh = {:.4}",
        recent_avg, previous_avg, factor
    );

    TrendEstimate {
        factor,
        recent_avg_kwh: Some(recent_avg),
        previous_avg_kwh: Some(previous_avg),
        advisory: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_history_is_neutral() {
        let totals = vec![5.0; 13];
        let trend = estimate_trend(&totals, 7);
        assert!((trend.factor - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            trend.advisory,
            Some(Advisory::InsufficientTrendHistory { days: 13 })
        );
    }

    #[test]
    fn test_ratio_of_last_two_weeks() {
        let mut totals = vec![100.0; 3]; // ignored, older than two windows
        totals.extend(vec![4.0; 7]);
        totals.extend(vec![5.0; 7]);
        let trend = estimate_trend(&totals, 7);
        assert!((trend.factor - 1.25).abs() < 1e-12);
        assert!(trend.advisory.is_none());
    }

    #[test]
    fn test_trend_is_unbounded() {
        let mut totals = vec![1.0; 7];
        totals.extend(vec![5.0; 7]);
        let trend = estimate_trend(&totals, 7);
        assert!((trend.factor - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_previous_week_is_neutral() {
        let mut totals = vec![0.0; 7];
        totals.extend(vec![3.0; 7]);
        let trend = estimate_trend(&totals, 7);
        assert!((trend.factor - 1.0).abs() < f64::EPSILON);
        assert_eq!(trend.advisory, Some(Advisory::ZeroBaselineTrend));
        assert_eq!(trend.recent_avg_kwh, Some(3.0));
    }
}
