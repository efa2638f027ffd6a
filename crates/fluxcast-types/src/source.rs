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
use std::fmt;

/// Where a collaborator value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Fetched from the upstream service during this run
    Live,
    /// Replayed from a previously captured snapshot
    Cached,
    /// Bundled static data or neutral default
    Fallback,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Cached => write!(f, "cached"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A value tagged with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: SourceKind,
}

impl<T> Sourced<T> {
    pub fn new(value: T, source: SourceKind) -> Self {
        Self { value, source }
    }

    pub fn live(value: T) -> Self {
        Self::new(value, SourceKind::Live)
    }

    pub fn cached(value: T) -> Self {
        Self::new(value, SourceKind::Cached)
    }

    pub fn fallback(value: T) -> Self {
        Self::new(value, SourceKind::Fallback)
    }

    /// Transform the value while keeping its provenance
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
        }
    }

    pub fn is_live(&self) -> bool {
        self.source == SourceKind::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_source() {
        let pct = Sourced::cached(1.5_f64);
        let factor = pct.map(|p| 1.0 + p / 100.0);
        assert_eq!(factor.source, SourceKind::Cached);
        assert!((factor.value - 1.015).abs() < 1e-12);
    }

    #[test]
    fn test_source_kind_serializes_lowercase() {
        let json = serde_json::to_string(&SourceKind::Fallback).unwrap();
        assert_eq!(json, "\"fallback\"");
        assert_eq!(SourceKind::Live.to_string(), "live");
    }
}
