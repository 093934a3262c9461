// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`GrievanceStore`].

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use grievance_config::StorageConfig;
use grievance_core::{
    GrievanceError, GrievanceRecord, GrievanceStore, HealthStatus, NewGrievance, PluginAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed grievance store.
///
/// The database is opened by [`SqliteGrievanceStore::initialize`]; every
/// other call fails until then.
pub struct SqliteGrievanceStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteGrievanceStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already open database (used with in-memory databases).
    pub fn from_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// Open the configured database file and run migrations.
    pub async fn initialize(&self) -> Result<(), GrievanceError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| GrievanceError::Storage {
            source: "storage already initialized".into(),
        })?;
        info!(path = %self.config.database_path, "grievance store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, GrievanceError> {
        self.db.get().ok_or_else(|| GrievanceError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Look up a single grievance.
    pub async fn get(&self, id: &str) -> Result<Option<GrievanceRecord>, GrievanceError> {
        queries::grievances::get_grievance(self.db()?, id).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteGrievanceStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, GrievanceError> {
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        Ok(match db.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), GrievanceError> {
        if let Some(db) = self.db.get() {
            if self.config.wal_mode {
                db.checkpoint().await?;
            }
            debug!("grievance store shut down");
        }
        Ok(())
    }
}

#[async_trait]
impl GrievanceStore for SqliteGrievanceStore {
    async fn create(&self, grievance: NewGrievance) -> Result<GrievanceRecord, GrievanceError> {
        let record = grievance.into_record();
        if let Err(e) = queries::grievances::insert_grievance(self.db()?, &record).await {
            error!(error = %e, "failed to persist grievance");
            return Err(e);
        }
        debug!(id = %record.id, "grievance persisted");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<GrievanceRecord>, GrievanceError> {
        queries::grievances::list_newest_first(self.db()?)
            .await
            .inspect_err(|e| error!(error = %e, "failed to list grievances"))
    }
}
