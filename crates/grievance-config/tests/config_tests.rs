// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use figment::Jail;
use grievance_config::{ConfigError, load_and_validate, load_and_validate_path, load_and_validate_str};
use grievance_core::RunMode;

#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5001);
    assert_eq!(config.portal.passphrase, "baby");
    assert_eq!(config.geolocation.base_url, "http://ip-api.com");
}

#[test]
fn full_config_parses() {
    let config = load_and_validate_str(
        r#"
[server]
host = "127.0.0.1"
port = 8080
mode = "production"
log_level = "debug"
cors_origin = "https://portal.example.com"

[storage]
database_path = "/var/lib/grievance/grievances.db"
wal_mode = false

[geolocation]
enabled = false
timeout_secs = 3

[ip]
extra_headers = ["x-edge-client-ip"]

[portal]
passphrase = "sunflower"
server_url = "https://api.example.com"
"#,
    )
    .unwrap();

    assert_eq!(config.server.mode, RunMode::Production);
    assert_eq!(config.server.port, 8080);
    assert!(!config.storage.wal_mode);
    assert!(!config.geolocation.enabled);
    assert_eq!(config.geolocation.timeout_secs, Some(3));
    assert_eq!(config.ip.extra_headers, vec!["x-edge-client-ip"]);
    assert_eq!(config.portal.recipient_name, "Aniket");
}

#[test]
fn typo_in_key_gets_suggestion() {
    let errors = load_and_validate_str("[server]\nprot = 5001\n").unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "prot");
            assert_eq!(suggestion.as_deref(), Some("port"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_mode_is_reported() {
    let errors = load_and_validate_str("[server]\nmode = \"prodution\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::UnknownValue {
            value, suggestion, ..
        } => {
            assert_eq!(value, "prodution");
            assert_eq!(suggestion.as_deref(), Some("production"));
        }
        other => panic!("expected UnknownValue, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[server]\nport = \"high\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::InvalidType { .. }));
}

#[test]
fn validation_runs_after_parsing() {
    let errors = load_and_validate_str("[portal]\nserver_url = \"localhost:5001\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn static_dir_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let ok = format!("[server]\nstatic_dir = {:?}\n", dir.path().display().to_string());
    assert!(load_and_validate_str(&ok).is_ok());

    let missing = dir.path().join("nope");
    let bad = format!("[server]\nstatic_dir = {:?}\n", missing.display().to_string());
    assert!(load_and_validate_str(&bad).is_err());
}

#[test]
fn local_file_and_env_are_layered() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "grievance.toml",
            "[server]\nport = 6000\nmode = \"test\"\n\n[portal]\nsender_name = \"Sam\"\n",
        )?;
        jail.set_env("GRIEVANCE_SERVER_PORT", "7000");
        jail.set_env("GRIEVANCE_PORTAL_SERVER_URL", "http://10.0.0.5:7000");

        let config = load_and_validate().map_err(|e| format!("{e:?}"))?;
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.mode, RunMode::Test);
        assert_eq!(config.portal.sender_name, "Sam");
        assert_eq!(config.portal.server_url, "http://10.0.0.5:7000");
        Ok(())
    });
}

#[test]
fn single_env_var_overrides_default() {
    Jail::expect_with(|jail| {
        jail.set_env("GRIEVANCE_SERVER_PORT", "7000");

        let config = load_and_validate().map_err(|e| format!("{e:?}"))?;
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "0.0.0.0");
        Ok(())
    });
}

#[test]
fn env_var_with_underscored_field_maps_into_section() {
    Jail::expect_with(|jail| {
        jail.set_env("GRIEVANCE_GEOLOCATION_TIMEOUT_SECS", "3");
        jail.set_env("GRIEVANCE_STORAGE_WAL_MODE", "false");

        let config = load_and_validate().map_err(|e| format!("{e:?}"))?;
        assert_eq!(config.geolocation.timeout_secs, Some(3));
        assert!(!config.storage.wal_mode);
        Ok(())
    });
}

#[test]
fn explicit_path_is_loaded() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[storage]\ndatabase_path = \"custom.db\"\n")?;
        let config =
            load_and_validate_path(std::path::Path::new("custom.toml")).map_err(|e| format!("{e:?}"))?;
        assert_eq!(config.storage.database_path, "custom.db");
        Ok(())
    });
}
