// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use grievance_config::StorageConfig;
use grievance_core::{Geolocation, GrievanceStore, NewGrievance};
use grievance_storage::SqliteGrievanceStore;

fn grievance(n: usize) -> NewGrievance {
    NewGrievance {
        title: format!("grievance {n}"),
        description: "something".to_string(),
        mood: None,
        severity: None,
        ip_address: "198.51.100.20".to_string(),
        geolocation: Geolocation {
            latitude: Some("17.385".to_string()),
            longitude: Some("78.4867".to_string()),
        },
    }
}

#[tokio::test]
async fn concurrent_creates_each_persist_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteGrievanceStore::new(StorageConfig {
        database_path: dir.path().join("concurrent.db").display().to_string(),
        wal_mode: true,
    }));
    store.initialize().await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.create(grievance(n)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let all = store.list().await.unwrap();
    assert_eq!(all.len(), 16);
    for pair in all.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
    assert!(all.iter().all(|r| r.geolocation.latitude.as_deref() == Some("17.385")));
}
