// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`GrievanceStore`] that counts writes and can be made to fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use grievance_core::{
    GrievanceError, GrievanceRecord, GrievanceStore, HealthStatus, NewGrievance, PluginAdapter,
};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryGrievanceStore {
    records: Mutex<Vec<GrievanceRecord>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryGrievanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful creates.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), GrievanceError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(GrievanceError::Storage {
                source: "memory store is failing".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PluginAdapter for MemoryGrievanceStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> Result<HealthStatus, GrievanceError> {
        Ok(match self.check() {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), GrievanceError> {
        Ok(())
    }
}

#[async_trait]
impl GrievanceStore for MemoryGrievanceStore {
    async fn create(&self, grievance: NewGrievance) -> Result<GrievanceRecord, GrievanceError> {
        self.check()?;
        let record = grievance.into_record();
        self.records.lock().await.push(record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    /// Newest first; later inserts win ties, matching the SQLite store.
    async fn list(&self) -> Result<Vec<GrievanceRecord>, GrievanceError> {
        self.check()?;
        let mut records: Vec<_> = self.records.lock().await.iter().cloned().rev().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grievance_core::Geolocation;

    fn grievance(title: &str) -> NewGrievance {
        NewGrievance {
            title: title.to_string(),
            description: "d".to_string(),
            mood: None,
            severity: None,
            ip_address: "198.51.100.1".to_string(),
            geolocation: Geolocation::default(),
        }
    }

    #[tokio::test]
    async fn failing_store_rejects_writes() {
        let store = MemoryGrievanceStore::new();
        store.set_failing(true);
        assert!(store.create(grievance("x")).await.is_err());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn list_is_newest_first_with_stable_ties() {
        let store = MemoryGrievanceStore::new();
        store.create(grievance("a")).await.unwrap();
        store.create(grievance("b")).await.unwrap();
        let titles: Vec<_> = store.list().await.unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, ["b", "a"]);
    }
}
