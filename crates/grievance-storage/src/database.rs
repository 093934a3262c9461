// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection setup: pragmas, migrations, WAL checkpoint on close.
//!
//! Every read and write goes through the one tokio-rusqlite background
//! thread. Do not open a second connection for writes.

use std::path::Path;

use grievance_core::GrievanceError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite call error into a storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> GrievanceError {
    GrievanceError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database file, apply pragmas, then run
    /// migrations.
    pub async fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, GrievanceError> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio_rusqlite::Connection::open(&path)
            .await
            .map_err(|e| GrievanceError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                let mode: String =
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
                debug!(journal_mode = %mode, "journal mode set");
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        let db = Self { conn };
        db.migrate().await?;
        debug!(path = %path.display(), wal_mode, "database opened");
        Ok(db)
    }

    /// In-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, GrievanceError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| GrievanceError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), GrievanceError> {
        self.conn
            .call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                other => GrievanceError::Storage {
                    source: Box::new(other),
                },
            })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), GrievanceError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    /// Trivial query used by health checks.
    pub async fn ping(&self) -> Result<(), GrievanceError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
