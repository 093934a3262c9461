// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered merging.
//!
//! Lookup order: `/etc/grievance/grievance.toml`, then
//! `~/.config/grievance/grievance.toml`, then `./grievance.toml`, with
//! `GRIEVANCE_*` environment variables applied last.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::GrievanceConfig;

/// Top-level sections that environment variables may address.
const SECTIONS: &[&str] = &["server", "storage", "geolocation", "ip", "portal"];

pub(crate) const LOCAL_CONFIG: &str = "grievance.toml";
pub(crate) const SYSTEM_CONFIG: &str = "/etc/grievance/grievance.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("grievance").join(LOCAL_CONFIG))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<GrievanceConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<GrievanceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GrievanceConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<GrievanceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GrievanceConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(GrievanceConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG));

    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }

    figment.merge(Toml::file(LOCAL_CONFIG)).merge(env_provider())
}

/// `GRIEVANCE_SERVER_PORT` -> `server.port`, `GRIEVANCE_PORTAL_SERVER_URL` ->
/// `portal.server_url`. Only the leading section name becomes a dot, so
/// underscores inside field names survive.
fn env_provider() -> Env {
    Env::prefixed("GRIEVANCE_").map(|key| map_env_key(key.as_str()).into())
}

/// Keys arrive with their original case; figment lowercases after mapping.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_only_the_section_prefix() {
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("portal_server_url"), "portal.server_url");
        assert_eq!(map_env_key("storage_wal_mode"), "storage.wal_mode");
        assert_eq!(map_env_key("ip_extra_headers"), "ip.extra_headers");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn env_keys_are_matched_case_insensitively() {
        assert_eq!(map_env_key("SERVER_PORT"), "server.port");
        assert_eq!(map_env_key("PORTAL_SERVER_URL"), "portal.server_url");
        assert_eq!(map_env_key("Geolocation_Timeout_Secs"), "geolocation.timeout_secs");
    }
}
