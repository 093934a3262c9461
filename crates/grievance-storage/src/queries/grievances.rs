// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grievance insert and listing.

use chrono::{DateTime, SecondsFormat, Utc};
use grievance_core::{Geolocation, GrievanceError, GrievanceRecord};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str = "SELECT id, title, description, mood, severity, ip_address, \
     latitude, longitude, created_at, updated_at FROM grievances";

/// RFC 3339, UTC, millisecond precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<GrievanceRecord> {
    Ok(GrievanceRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        mood: row.get(3)?,
        severity: row.get(4)?,
        ip_address: row.get(5)?,
        geolocation: Geolocation {
            latitude: row.get(6)?,
            longitude: row.get(7)?,
        },
        created_at: parse_timestamp(8, row.get(8)?)?,
        updated_at: parse_timestamp(9, row.get(9)?)?,
    })
}

/// Insert a fully stamped record.
pub async fn insert_grievance(db: &Database, record: &GrievanceRecord) -> Result<(), GrievanceError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO grievances (id, title, description, mood, severity, ip_address, \
                 latitude, longitude, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.id,
                    record.title,
                    record.description,
                    record.mood,
                    record.severity,
                    record.ip_address,
                    record.geolocation.latitude,
                    record.geolocation.longitude,
                    format_timestamp(&record.created_at),
                    format_timestamp(&record.updated_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Every grievance, newest first. Equal timestamps list the later insert first.
pub async fn list_newest_first(db: &Database) -> Result<Vec<GrievanceRecord>, GrievanceError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC"))?;
            let rows = stmt.query_map([], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch one grievance by id.
pub async fn get_grievance(db: &Database, id: &str) -> Result<Option<GrievanceRecord>, GrievanceError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            match stmt.query_row(params![id], row_to_record) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Number of stored grievances.
pub async fn count_grievances(db: &Database) -> Result<i64, GrievanceError> {
    db.connection()
        .call(|conn| conn.query_row("SELECT count(*) FROM grievances", [], |row| row.get(0)))
        .await
        .map_err(map_tr_err)
}
