// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::GrievanceConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration. Collects every failure rather than
/// stopping at the first.
pub fn validate_config(config: &GrievanceConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_ip && !is_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        fail("server.port must not be 0".to_string());
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        fail(format!(
            "server.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.server.log_level
        ));
    }

    if let Some(origin) = &config.server.cors_origin {
        if !is_http_url(origin) {
            fail(format!(
                "server.cors_origin `{origin}` must start with http:// or https://"
            ));
        }
    }

    if let Some(dir) = &config.server.static_dir {
        if !std::path::Path::new(dir).is_dir() {
            fail(format!("server.static_dir `{dir}` is not a directory"));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if !is_http_url(&config.geolocation.base_url) {
        fail(format!(
            "geolocation.base_url `{}` must start with http:// or https://",
            config.geolocation.base_url
        ));
    }

    if config.geolocation.timeout_secs == Some(0) {
        fail("geolocation.timeout_secs must be at least 1 when set".to_string());
    }

    for (i, header) in config.ip.extra_headers.iter().enumerate() {
        let valid = !header.is_empty()
            && header
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            fail(format!("ip.extra_headers[{i}] `{header}` is not a valid header name"));
        }
    }

    if config.portal.passphrase.is_empty() {
        fail("portal.passphrase must not be empty".to_string());
    }

    if !is_http_url(&config.portal.server_url) {
        fail(format!(
            "portal.server_url `{}` must start with http:// or https://",
            config.portal.server_url
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
