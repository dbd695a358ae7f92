//! Error types for campus-rs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
///
/// The workflow-specific variants are deterministic, caller-facing outcomes
/// of a state-machine check; they are never retried automatically. The
/// infrastructure variants (`Database`, `Redis`, `Queue`, ...) are transient
/// and must not leak as business errors.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Workflow Errors ===
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Already processed: {0}")]
    AlreadyProcessed(String),

    #[error("Attendance already marked: {0}")]
    AlreadyMarked(String),

    #[error("All {skipped} students already marked for this date")]
    AllAlreadyMarked {
        /// Size of the resolved target set, every member already marked.
        skipped: u64,
    },

    #[error("No students resolved for bulk marking")]
    NoStudents,

    #[error("No batch available: {0}")]
    NoBatchAvailable(String),

    #[error("Duplicate transaction id: {0}")]
    DuplicateTransaction(String),

    #[error("Batch capacity exceeded: {0}")]
    CapacityExceeded(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Validation(_) | Self::InvalidStatus(_) | Self::NoStudents => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict(_)
            | Self::InvalidSequence(_)
            | Self::AlreadyProcessed(_)
            | Self::AlreadyMarked(_)
            | Self::AllAlreadyMarked { .. }
            | Self::DuplicateTransaction(_)
            | Self::CapacityExceeded(_) => StatusCode::CONFLICT,
            Self::NoBatchAvailable(_) => StatusCode::UNPROCESSABLE_ENTITY,

            // 5xx Server Errors
            Self::Database(_)
            | Self::Redis(_)
            | Self::Queue(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidSequence(_) => "INVALID_SEQUENCE",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::AlreadyProcessed(_) => "ALREADY_PROCESSED",
            Self::AlreadyMarked(_) => "ALREADY_MARKED",
            Self::AllAlreadyMarked { .. } => "ALL_ALREADY_MARKED",
            Self::NoStudents => "NO_STUDENTS",
            Self::NoBatchAvailable(_) => "NO_BATCH_AVAILABLE",
            Self::DuplicateTransaction(_) => "DUPLICATE_TRANSACTION",
            Self::CapacityExceeded(_) => "CAPACITY_EXCEEDED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Redis(_) => "REDIS_ERROR",
            Self::Queue(_) => "QUEUE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_errors_are_client_errors() {
        let errors = [
            AppError::InvalidSequence("financial verification requires ACADEMIC_REVIEWED".into()),
            AppError::InvalidStatus("APPROVED is not legal for academic review".into()),
            AppError::AlreadyProcessed("payment 01".into()),
            AppError::AlreadyMarked("student 02".into()),
            AppError::AllAlreadyMarked { skipped: 3 },
            AppError::NoStudents,
            AppError::NoBatchAvailable("course 03".into()),
            AppError::DuplicateTransaction("TX1".into()),
            AppError::CapacityExceeded("batch 04".into()),
        ];

        for e in errors {
            assert!(
                e.status_code().is_client_error(),
                "{} should be 4xx",
                e.error_code()
            );
            assert!(!e.is_server_error());
        }
    }

    #[test]
    fn all_already_marked_reports_the_roster_size() {
        let e = AppError::AllAlreadyMarked { skipped: 12 };
        assert_eq!(e.to_string(), "All 12 students already marked for this date");
        assert_eq!(e.error_code(), "ALL_ALREADY_MARKED");
    }

    #[test]
    fn infrastructure_errors_are_server_errors() {
        assert!(AppError::Database("boom".into()).is_server_error());
        assert!(AppError::Redis("down".into()).is_server_error());
        assert!(AppError::Queue("full".into()).is_server_error());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            AppError::AlreadyProcessed("p".into()).error_code(),
            "ALREADY_PROCESSED"
        );
        assert_eq!(
            AppError::NoBatchAvailable("c".into()).error_code(),
            "NO_BATCH_AVAILABLE"
        );
        assert_eq!(
            AppError::DuplicateTransaction("t".into()).error_code(),
            "DUPLICATE_TRANSACTION"
        );
    }
}
