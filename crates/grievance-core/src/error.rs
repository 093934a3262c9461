// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the grievance portal.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum GrievanceError {
    /// A submission is missing a required field or carries an unusable value.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Storage backend errors (database open, query failure, row decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// IP-geolocation lookup errors (network failure, malformed body, non-success status).
    #[error("geolocation error: {message}")]
    Geolocation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP transport errors raised by outbound clients.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid values, unusable paths).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GrievanceError {
    /// Validation error for a required field that is absent or blank.
    pub fn missing(field: &'static str) -> Self {
        Self::Validation {
            field,
            message: format!("{field} is required"),
        }
    }

    /// Returns `true` for errors caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_the_field() {
        let err = GrievanceError::missing("title");
        assert_eq!(err.to_string(), "title is required");
        assert!(err.is_validation());
    }

    #[test]
    fn storage_error_wraps_source() {
        let err = GrievanceError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert_eq!(err.to_string(), "storage error: disk full");
        assert!(!err.is_validation());
    }
}
