// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted [`GeoLocator`] doubles.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use grievance_core::{Coordinates, GeoLocator, GrievanceError};

/// Always returns the same coordinates and records the addresses asked for.
pub struct StaticLocator {
    coordinates: Coordinates,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl StaticLocator {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Addresses passed to `locate`, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GeoLocator for StaticLocator {
    async fn locate(&self, ip: &str) -> Result<Coordinates, GrievanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(ip.to_string());
        }
        Ok(self.coordinates)
    }
}

/// Always fails, like an unreachable service.
#[derive(Default)]
pub struct FailingLocator {
    calls: AtomicUsize,
}

impl FailingLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLocator for FailingLocator {
    async fn locate(&self, _ip: &str) -> Result<Coordinates, GrievanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GrievanceError::Geolocation {
            message: "service unreachable".to_string(),
            source: None,
        })
    }
}
