// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, applied on every open.

use grievance_core::GrievanceError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations. Refinery records progress in
/// `refinery_schema_history`, so reopening an existing file is a no-op.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), GrievanceError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| GrievanceError::Storage {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        tracing::info!(version = migration.version(), name = migration.name(), "migration applied");
    }
    Ok(())
}
