// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP handlers.
//!
//! - `POST /api/grievances`
//! - `GET /api/grievances`
//! - `GET /health`
//! - `GET /` (welcome message when no static assets are served)

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use grievance_core::{GrievanceRecord, GrievanceRequest, HealthStatus, PluginAdapter};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::client_ip::ClientIp;
use crate::error::ApiError;
use crate::server::AppState;

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub storage: String,
}

/// POST /api/grievances
pub async fn create_grievance(
    State(state): State<AppState>,
    Extension(client_ip): Extension<ClientIp>,
    body: Result<Json<GrievanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GrievanceRecord>), ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::create_failed(rejection.body_text()))?;

    match state.service.submit(request, &client_ip.address).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(e) => {
            if !e.is_validation() {
                error!(error = %e, "grievance submission failed");
            }
            Err(ApiError::create_failed(e))
        }
    }
}

/// GET /api/grievances
pub async fn list_grievances(
    State(state): State<AppState>,
) -> Result<Json<Vec<GrievanceRecord>>, ApiError> {
    state
        .service
        .list()
        .await
        .map(Json)
        .map_err(ApiError::list_failed)
}

/// GET /
pub async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Grievance Portal API" }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    let storage = match state.service.store().health_check().await {
        Ok(status) => status,
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    };

    let (code, status, storage) = match storage {
        HealthStatus::Healthy => (StatusCode::OK, "ok", "healthy".to_string()),
        HealthStatus::Degraded(reason) => {
            (StatusCode::OK, "degraded", format!("degraded: {reason}"))
        }
        HealthStatus::Unhealthy(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            format!("unhealthy: {reason}"),
        ),
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
        storage,
    };
    (code, Json(body)).into_response()
}
