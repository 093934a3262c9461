// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by all adapters.

use async_trait::async_trait;

use crate::error::GrievanceError;
use crate::types::HealthStatus;

#[async_trait]
pub trait PluginAdapter: Send + Sync {
    /// Short identifier used in logs and health output.
    fn name(&self) -> &str;

    /// Reports whether the adapter can currently serve requests.
    async fn health_check(&self) -> Result<HealthStatus, GrievanceError>;

    /// Releases resources held by the adapter.
    async fn shutdown(&self) -> Result<(), GrievanceError>;
}
