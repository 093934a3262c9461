// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for grievances.
//!
//! One row per grievance, schema managed by embedded migrations, all access
//! serialized through a single `tokio-rusqlite` connection.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteGrievanceStore;
pub use database::Database;
