// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort device location.

use async_trait::async_trait;
use grievance_core::Coordinates;

/// Source of the device's own position. Denial, absence of the capability,
/// and errors all look the same to the flow: `None`.
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(&self) -> Option<Coordinates>;
}

/// A device without location support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeviceLocation;

#[async_trait]
impl DeviceLocator for NoDeviceLocation {
    async fn current_position(&self) -> Option<Coordinates> {
        None
    }
}

/// A position supplied up front, e.g. from command-line flags.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl DeviceLocator for FixedLocation {
    async fn current_position(&self) -> Option<Coordinates> {
        Some(self.0)
    }
}
