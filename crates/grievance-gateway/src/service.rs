// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission and listing logic, independent of HTTP.

use std::sync::Arc;

use grievance_core::{
    Coordinates, GeoLocator, GrievanceError, GrievanceRecord, GrievanceRequest, GrievanceStore,
};
use tracing::{debug, info, warn};

/// Validates submissions, enriches them with coordinates, and persists them.
#[derive(Clone)]
pub struct GrievanceService {
    store: Arc<dyn GrievanceStore>,
    locator: Option<Arc<dyn GeoLocator>>,
}

impl GrievanceService {
    /// `locator` of `None` disables IP geolocation entirely.
    pub fn new(store: Arc<dyn GrievanceStore>, locator: Option<Arc<dyn GeoLocator>>) -> Self {
        Self { store, locator }
    }

    pub fn store(&self) -> &Arc<dyn GrievanceStore> {
        &self.store
    }

    /// Validate, geolocate if needed, and persist one grievance.
    ///
    /// Validation happens before any lookup or write. Lookup failures are
    /// logged and leave the coordinates null.
    pub async fn submit(
        &self,
        request: GrievanceRequest,
        client_ip: &str,
    ) -> Result<GrievanceRecord, GrievanceError> {
        let draft = request.into_draft()?;

        let looked_up = if draft.needs_lookup() {
            self.lookup(client_ip).await
        } else {
            None
        };

        let grievance = draft.with_origin(client_ip, looked_up)?;
        let record = self.store.create(grievance).await?;
        info!(id = %record.id, ip = %record.ip_address, "grievance created");
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<GrievanceRecord>, GrievanceError> {
        self.store.list().await
    }

    async fn lookup(&self, ip: &str) -> Option<Coordinates> {
        let locator = self.locator.as_ref()?;
        match locator.locate(ip).await {
            Ok(coords) => {
                debug!(%ip, lat = coords.latitude, lon = coords.longitude, "geolocation found");
                Some(coords)
            }
            Err(e) => {
                warn!(%ip, error = %e, "geolocation lookup failed, continuing without coordinates");
                None
            }
        }
    }
}
