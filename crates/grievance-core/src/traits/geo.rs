// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IP-geolocation lookup trait.

use async_trait::async_trait;

use crate::error::GrievanceError;
use crate::types::Coordinates;

#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Looks up approximate coordinates for an address string.
    ///
    /// Callers treat every error as "no coordinates"; implementations should
    /// not retry.
    async fn locate(&self, ip: &str) -> Result<Coordinates, GrievanceError>;
}
