// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface of the grievance portal.
//!
//! Requests first pass through client IP capture, then reach the submission
//! and listing handlers, which delegate to [`GrievanceService`].

pub mod client_ip;
pub mod error;
pub mod handlers;
pub mod server;
pub mod service;

pub use client_ip::ClientIp;
pub use error::ApiError;
pub use server::{AppState, ServerOptions, build_router, start_server};
pub use service::GrievanceService;
