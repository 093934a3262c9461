// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grievance records, inbound submissions, and shared value types.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::GrievanceError;

/// Process run mode. Anything other than `Production` enables the simulated
/// client address in the IP escalation pass.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Development,
    Production,
    Test,
}

impl RunMode {
    pub fn is_production(self) -> bool {
        self == RunMode::Production
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A latitude/longitude pair as returned by a geolocation lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Stored geolocation. Both halves are text and either may be null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl Geolocation {
    /// Client-supplied values win per coordinate, then the lookup result, then null.
    pub fn resolve(
        client_latitude: Option<String>,
        client_longitude: Option<String>,
        looked_up: Option<Coordinates>,
    ) -> Self {
        Self {
            latitude: client_latitude.or_else(|| looked_up.map(|c| c.latitude.to_string())),
            longitude: client_longitude.or_else(|| looked_up.map(|c| c.longitude.to_string())),
        }
    }
}

/// The persisted grievance document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrievanceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    pub ip_address: String,
    #[serde(default)]
    pub geolocation: Geolocation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/grievances`.
///
/// Every field is optional at the wire level so that a missing `title` or
/// `description` surfaces as a validation message instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GrievanceRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    /// Browsers send numbers, older clients send strings.
    #[serde(default, deserialize_with = "coordinate_text")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "coordinate_text")]
    pub longitude: Option<String>,
}

/// A submission that passed presence validation, with all text trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrievanceDraft {
    pub title: String,
    pub description: String,
    pub mood: Option<String>,
    pub severity: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl GrievanceRequest {
    /// Trim every field and reject the request if `title` or `description` is blank.
    pub fn into_draft(self) -> Result<GrievanceDraft, GrievanceError> {
        let title = non_blank(self.title).ok_or_else(|| GrievanceError::missing("title"))?;
        let description =
            non_blank(self.description).ok_or_else(|| GrievanceError::missing("description"))?;

        Ok(GrievanceDraft {
            title,
            description,
            mood: non_blank(self.mood),
            severity: non_blank(self.severity),
            latitude: non_blank(self.latitude),
            longitude: non_blank(self.longitude),
        })
    }
}

impl GrievanceDraft {
    /// Whether an IP-geolocation lookup could still contribute a coordinate.
    pub fn needs_lookup(&self) -> bool {
        self.latitude.is_none() || self.longitude.is_none()
    }

    /// Attach the resolved client address and any looked-up coordinates.
    pub fn with_origin(
        self,
        ip_address: &str,
        looked_up: Option<Coordinates>,
    ) -> Result<NewGrievance, GrievanceError> {
        let ip_address = ip_address.trim();
        if ip_address.is_empty() {
            return Err(GrievanceError::missing("ipAddress"));
        }

        Ok(NewGrievance {
            geolocation: Geolocation::resolve(self.latitude, self.longitude, looked_up),
            title: self.title,
            description: self.description,
            mood: self.mood,
            severity: self.severity,
            ip_address: ip_address.to_string(),
        })
    }
}

/// A grievance ready to be written. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGrievance {
    pub title: String,
    pub description: String,
    pub mood: Option<String>,
    pub severity: Option<String>,
    pub ip_address: String,
    pub geolocation: Geolocation,
}

impl NewGrievance {
    /// Stamp with a fresh UUID and the current time (millisecond precision).
    pub fn into_record(self) -> GrievanceRecord {
        let now = now_millis();
        GrievanceRecord {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            description: self.description,
            mood: self.mood,
            severity: self.severity,
            ip_address: self.ip_address,
            geolocation: self.geolocation,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Current UTC time truncated to milliseconds, the precision stored on disk.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

fn coordinate_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCoordinate>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawCoordinate::Number(n)) => Some(n.to_string()),
        Some(RawCoordinate::Text(s)) => non_blank(Some(s)),
        None => None,
    })
}
