// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grievance persistence trait.

use async_trait::async_trait;

use crate::error::GrievanceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GrievanceRecord, NewGrievance};

/// Create/list persistence over a single grievance collection.
///
/// Records are immutable once created; there is no update or delete.
#[async_trait]
pub trait GrievanceStore: PluginAdapter {
    /// Persists one grievance, assigning its identifier and timestamps.
    async fn create(&self, grievance: NewGrievance) -> Result<GrievanceRecord, GrievanceError>;

    /// Returns every grievance, newest first.
    async fn list(&self) -> Result<Vec<GrievanceRecord>, GrievanceError>;
}
