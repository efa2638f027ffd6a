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

//! Data loaders for history exports and saved collaborator snapshots.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use fluxcast_core::load_history_file;
use fluxcast_types::{HistoryDocument, NationalGridSnapshot, Sourced, WeatherSnapshot};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::synthetic::{SyntheticHistoryConfig, SyntheticHistoryGenerator};

/// Trait for loading one kind of pipeline input
pub trait DataLoader {
    type Output;

    fn load(&self) -> Result<Self::Output>;
}

/// Loader for meter history exports
#[derive(Debug)]
pub struct HistoryLoader {
    path: PathBuf,
    timezone: Tz,
}

impl HistoryLoader {
    pub fn new(path: impl Into<PathBuf>, timezone: Tz) -> Self {
        Self {
            path: path.into(),
            timezone,
        }
    }
}

impl DataLoader for HistoryLoader {
    type Output = HistoryDocument;

    fn load(&self) -> Result<HistoryDocument> {
        load_history_file(&self.path, self.timezone)
            .with_context(|| format!("Failed to load history from {}", self.path.display()))
    }
}

/// Loader for generated history
#[derive(Debug)]
pub struct SyntheticLoader {
    pub config: SyntheticHistoryConfig,
}

impl DataLoader for SyntheticLoader {
    type Output = HistoryDocument;

    fn load(&self) -> Result<HistoryDocument> {
        Ok(SyntheticHistoryGenerator::generate(&self.config))
    }
}

/// Loader for a weather snapshot saved as JSON
#[derive(Debug)]
pub struct WeatherJsonLoader {
    path: PathBuf,
}

impl WeatherJsonLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataLoader for WeatherJsonLoader {
    type Output = Sourced<WeatherSnapshot>;

    fn load(&self) -> Result<Sourced<WeatherSnapshot>> {
        read_json::<WeatherSnapshot>(&self.path).map(Sourced::cached)
    }
}

/// Loader for a national grid snapshot saved as JSON
#[derive(Debug)]
pub struct NationalJsonLoader {
    path: PathBuf,
}

impl NationalJsonLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataLoader for NationalJsonLoader {
    type Output = Sourced<NationalGridSnapshot>;

    fn load(&self) -> Result<Sourced<NationalGridSnapshot>> {
        read_json::<NationalGridSnapshot>(&self.path).map(Sourced::cached)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
