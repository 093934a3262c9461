// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! Every struct uses `#[serde(deny_unknown_fields)]` so that a misspelled key
//! fails at startup instead of silently falling back to a default.

use grievance_core::RunMode;
use serde::{Deserialize, Serialize};

/// Top-level configuration. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GrievanceConfig {
    /// HTTP listener and runtime mode.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Third-party IP-geolocation lookup.
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Client IP resolution.
    #[serde(default)]
    pub ip: IpConfig,

    /// Terminal portal (client flow).
    #[serde(default)]
    pub portal: PortalConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Run mode. Non-production modes substitute a documentation-range
    /// address when no client IP can be found.
    #[serde(default)]
    pub mode: RunMode,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Allowed CORS origin. `None` allows any origin.
    #[serde(default)]
    pub cors_origin: Option<String>,

    /// Directory of built client assets served at `/`.
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            mode: RunMode::default(),
            log_level: default_log_level(),
            cors_origin: None,
            static_dir: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "grievances.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// IP-geolocation lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeolocationConfig {
    /// Perform lookups when the client sends no coordinates.
    #[serde(default = "default_geolocation_enabled")]
    pub enabled: bool,

    /// Base URL of the ip-api compatible service.
    #[serde(default = "default_geolocation_base_url")]
    pub base_url: String,

    /// Request timeout. `None` leaves the HTTP client default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enabled: default_geolocation_enabled(),
            base_url: default_geolocation_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_geolocation_enabled() -> bool {
    true
}

fn default_geolocation_base_url() -> String {
    "http://ip-api.com".to_string()
}

/// Client IP resolution configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IpConfig {
    /// Extra proxy header names scanned after the built-in list.
    #[serde(default)]
    pub extra_headers: Vec<String>,
}

/// Terminal portal configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PortalConfig {
    /// Shared secret that unlocks the form.
    #[serde(default = "default_passphrase")]
    pub passphrase: String,

    /// Base URL of the grievance API.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Name shown on the confirmation screen as the submitter.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Name shown on the confirmation screen as the recipient.
    #[serde(default = "default_recipient_name")]
    pub recipient_name: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            passphrase: default_passphrase(),
            server_url: default_server_url(),
            sender_name: default_sender_name(),
            recipient_name: default_recipient_name(),
        }
    }
}

impl std::fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalConfig")
            .field("passphrase", &"[redacted]")
            .field("server_url", &self.server_url)
            .field("sender_name", &self.sender_name)
            .field("recipient_name", &self.recipient_name)
            .finish()
    }
}

fn default_passphrase() -> String {
    "baby".to_string()
}

fn default_server_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_sender_name() -> String {
    "Anuhya".to_string()
}

fn default_recipient_name() -> String {
    "Aniket".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = GrievanceConfig::default();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.mode, RunMode::Development);
        assert_eq!(config.storage.database_path, "grievances.db");
        assert!(config.geolocation.enabled);
        assert!(config.geolocation.timeout_secs.is_none());
        assert!(config.ip.extra_headers.is_empty());
    }

    #[test]
    fn portal_debug_redacts_passphrase() {
        let config = PortalConfig {
            passphrase: "open-sesame".to_string(),
            ..PortalConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("open-sesame"));
        assert!(debug.contains("[redacted]"));
    }
}
