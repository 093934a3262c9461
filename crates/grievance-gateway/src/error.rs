// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const CREATE_FAILED: &str = "Error creating grievance";
pub const LIST_FAILED: &str = "Error fetching grievances";

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Which operation failed.
    pub message: &'static str,
    /// The underlying cause.
    pub error: String,
}

/// An error that renders as `{ message, error }` with a fixed status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Submission failure: validation, malformed body, or persistence.
    pub fn create_failed(error: impl ToString) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: CREATE_FAILED,
                error: error.to_string(),
            },
        }
    }

    pub fn list_failed(error: impl ToString) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                message: LIST_FAILED,
                error: error.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_failures_are_client_errors() {
        let err = ApiError::create_failed("title is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body.message, CREATE_FAILED);
    }

    #[test]
    fn list_failures_are_server_errors() {
        assert_eq!(
            ApiError::list_failed("disk I/O error").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
