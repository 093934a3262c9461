// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for ip-api compatible geolocation services.
//!
//! One `GET {base}/json/{ip}?fields=status,message,lat,lon` per lookup. No
//! retries; callers decide what a failure means.

use std::time::Duration;

use async_trait::async_trait;
use grievance_config::GeolocationConfig;
use grievance_core::{Coordinates, GeoLocator, GrievanceError};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

const FIELDS_QUERY: &str = "fields=status,message,lat,lon";

/// Body returned by the service. Only `status` is always present.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl LookupResponse {
    fn into_coordinates(self) -> Result<Coordinates, GrievanceError> {
        if self.status != "success" {
            return Err(geo_error(format!(
                "lookup status `{}`: {}",
                self.status,
                self.message.as_deref().unwrap_or("no message")
            )));
        }
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(geo_error("lookup succeeded without coordinates".to_string())),
        }
    }
}

/// HTTP geolocation client.
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    client: reqwest::Client,
    base_url: Url,
}

impl IpApiLocator {
    /// Build a locator. `timeout` of `None` keeps reqwest's default (no timeout).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, GrievanceError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GrievanceError::Config(format!("invalid geolocation base_url `{base_url}`: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GrievanceError::Config(format!(
                "geolocation base_url `{base_url}` cannot carry a path"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| GrievanceError::Transport {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &GeolocationConfig) -> Result<Self, GrievanceError> {
        Self::new(
            &config.base_url,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    /// `{base}/json/{ip}` with the field filter. The address is pushed as a
    /// single path segment, so unvalidated header text cannot alter the URL.
    fn lookup_url(&self, ip: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("json").push(ip);
        }
        url.set_query(Some(FIELDS_QUERY));
        url
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn locate(&self, ip: &str) -> Result<Coordinates, GrievanceError> {
        let ip = ip.trim();
        if ip.is_empty() {
            return Err(geo_error("no address to look up".to_string()));
        }

        let url = self.lookup_url(ip);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GrievanceError::Geolocation {
                message: format!("request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(%ip, status = %status, "geolocation response received");
        if !status.is_success() {
            return Err(geo_error(format!("service returned {status}")));
        }

        let body: LookupResponse = response.json().await.map_err(|e| GrievanceError::Geolocation {
            message: format!("malformed response: {e}"),
            source: Some(Box::new(e)),
        })?;
        body.into_coordinates()
    }
}

fn geo_error(message: String) -> GrievanceError {
    GrievanceError::Geolocation {
        message,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn locator(server: &MockServer) -> IpApiLocator {
        IpApiLocator::new(&server.uri(), Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn success_returns_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/198.51.100.7"))
            .and(query_param("fields", "status,message,lat,lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 17.385,
                "lon": 78.4867
            })))
            .expect(1)
            .mount(&server)
            .await;

        let coords = locator(&server).locate("198.51.100.7").await.unwrap();
        assert_eq!(coords.latitude, 17.385);
        assert_eq!(coords.longitude, 78.4867);
    }

    #[tokio::test]
    async fn fail_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "reserved range"
            })))
            .mount(&server)
            .await;

        let err = locator(&server).locate("10.0.0.1").await.unwrap_err();
        assert!(err.to_string().contains("reserved range"));
    }

    #[tokio::test]
    async fn success_without_coordinates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "success", "lat": 1.0 })),
            )
            .mount(&server)
            .await;

        assert!(locator(&server).locate("198.51.100.7").await.is_err());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;

        let err = locator(&server).locate("198.51.100.7").await.unwrap_err();
        assert!(matches!(err, GrievanceError::Geolocation { .. }));
    }

    #[tokio::test]
    async fn http_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        assert!(locator(&server).locate("198.51.100.7").await.is_err());
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let locator = IpApiLocator::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        assert!(locator.locate("198.51.100.7").await.is_err());
    }

    #[test]
    fn hostile_address_stays_in_one_segment() {
        let locator = IpApiLocator::new("http://ip-api.com", None).unwrap();
        let url = locator.lookup_url("1.2.3.4/../admin?x=1");
        assert_eq!(url.host_str(), Some("ip-api.com"));
        assert_eq!(url.query(), Some(FIELDS_QUERY));
        assert_eq!(url.path_segments().unwrap().count(), 2);
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = IpApiLocator::new("not a url", None).unwrap_err();
        assert!(matches!(err, GrievanceError::Config(_)));
    }

    #[test]
    fn base_url_with_path_prefix_is_kept() {
        let locator = IpApiLocator::new("http://geo.internal/ipapi/", None).unwrap();
        assert_eq!(
            locator.lookup_url("8.8.8.8").path(),
            "/ipapi/json/8.8.8.8"
        );
    }
}
