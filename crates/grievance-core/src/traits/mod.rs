// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Persistence and geolocation sit behind traits so the HTTP layer can be
//! exercised against in-memory doubles.

pub mod adapter;
pub mod geo;
pub mod store;

pub use adapter::PluginAdapter;
pub use geo::GeoLocator;
pub use store::GrievanceStore;
