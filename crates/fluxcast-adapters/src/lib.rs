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

//! Live data collaborators: Open-Meteo weather and REN national consumption.

pub mod errors;
pub mod fallback;
pub mod http;
pub mod open_meteo;
pub mod ren;

pub use errors::{AdapterError, AdapterResult};
pub use fallback::static_grid_snapshot;
pub use http::JsonHttpClient;
pub use open_meteo::OpenMeteoClient;
pub use ren::RenGridClient;
