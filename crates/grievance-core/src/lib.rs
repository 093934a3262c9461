// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the grievance portal.
//!
//! Holds the record and request types, the error taxonomy, and the adapter
//! traits that the storage, geolocation, and gateway crates implement or
//! consume.

pub mod error;
pub mod traits;
pub mod types;

pub use error::GrievanceError;
pub use traits::{GeoLocator, GrievanceStore, PluginAdapter};
pub use types::{
    Coordinates, Geolocation, GrievanceDraft, GrievanceRecord, GrievanceRequest, HealthStatus,
    NewGrievance, RunMode,
};
