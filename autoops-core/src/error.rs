//! Error types for AutoOps operations
//!
//! Every variant carries:
//! - a human-readable message
//! - a stable error code (e.g. `EVENT_NOT_FOUND`) for programmatic handling
//! - a category for grouping
//! - an HTTP status code used by the API server
//!
//! # Example
//!
//! ```rust
//! use autoops_core::error::{AutoOpsError, ErrorCategory};
//!
//! let err = AutoOpsError::EventNotFound { event_id: "E404".to_string() };
//! assert_eq!(err.category(), ErrorCategory::NotFound);
//! assert_eq!(err.http_status_code(), 404);
//! assert_eq!(err.error_code(), "EVENT_NOT_FOUND");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for AutoOps operations
pub type Result<T> = std::result::Result<T, AutoOpsError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Resource not found (404)
    NotFound,
    /// Input validation failed (400)
    Validation,
    /// Resource state conflict (409)
    Conflict,
    /// Data integrity error (422)
    Integrity,
    /// Dependency not configured (503)
    Unavailable,
    /// Internal server error (500)
    Internal,
    /// External service error (502)
    External,
}

/// Errors that can occur in AutoOps operations
#[derive(Error, Debug)]
pub enum AutoOpsError {
    // ═══════════════════════════════════════════════════════════════════════
    // Event errors
    // ═══════════════════════════════════════════════════════════════════════

    /// No event with the given ID exists
    #[error("Event not found: '{event_id}'")]
    EventNotFound { event_id: String },

    /// An event with the given ID is already stored
    #[error("Event already exists: '{event_id}'")]
    EventAlreadyExists { event_id: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Override errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Override justification is shorter than the required minimum
    #[error("Reason must be at least {minimum} characters (got {actual})")]
    ReasonTooShort { minimum: usize, actual: usize },

    /// Requested alternative index does not exist on the decision
    #[error("Selection {index} is out of range: decision has {available} alternative(s)")]
    SelectionOutOfRange { index: usize, available: usize },

    /// Filter key is not a known category
    #[error("Unknown filter '{key}'. Expected all, shift_coverage, payout_approval, onboarding, feedback_processing or unclassified.")]
    InvalidFilter { key: String },

    /// Shift-missing intake payload is malformed
    #[error("Invalid intake event: {reason}")]
    InvalidIntake { reason: String },

    /// The event has no recorded decision to override
    #[error("Event '{event_id}' has no decision to override")]
    NoDecision { event_id: String },

    /// Decision record violates its own invariants
    #[error("Invalid decision: {reason}")]
    InvalidDecision { reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Supervisor errors (shift-missing intake)
    // ═══════════════════════════════════════════════════════════════════════

    /// No supervisor endpoint is configured
    #[error("Supervisor not configured. Set AUTOOPS_SUPERVISOR_URL to enable intake.")]
    SupervisorUnavailable,

    /// The supervisor call failed
    #[error("Supervisor failed: {reason}")]
    SupervisorFailed { reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Infrastructure errors
    // ═══════════════════════════════════════════════════════════════════════

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Event store lock is poisoned (panic occurred while holding lock)
    #[error("Event store lock poisoned. This is a bug; please report it.")]
    StoreLocked,

    /// I/O operation failed
    #[error("IO error: {message}")]
    IoError { message: String },

    /// Internal error that shouldn't happen
    #[error("Internal error: {reason}. This is a bug; please report it.")]
    InternalError { reason: String },
}

impl AutoOpsError {
    /// Returns true if this error might succeed on retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AutoOpsError::SupervisorFailed { .. } | AutoOpsError::StoreLocked
        )
    }

    /// Returns true if this error is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(self.http_status_code(), 400..=499)
    }

    /// Returns true if this error is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        matches!(self.http_status_code(), 500..=599)
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            AutoOpsError::EventNotFound { .. } => ErrorCategory::NotFound,

            AutoOpsError::ReasonTooShort { .. }
            | AutoOpsError::SelectionOutOfRange { .. }
            | AutoOpsError::InvalidFilter { .. }
            | AutoOpsError::InvalidIntake { .. } => ErrorCategory::Validation,

            AutoOpsError::EventAlreadyExists { .. }
            | AutoOpsError::NoDecision { .. } => ErrorCategory::Conflict,

            AutoOpsError::InvalidDecision { .. } => ErrorCategory::Integrity,

            AutoOpsError::SupervisorUnavailable => ErrorCategory::Unavailable,

            AutoOpsError::StoreLocked | AutoOpsError::InternalError { .. } => {
                ErrorCategory::Internal
            }

            AutoOpsError::SupervisorFailed { .. }
            | AutoOpsError::JsonError(_)
            | AutoOpsError::IoError { .. } => ErrorCategory::External,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AutoOpsError::EventNotFound { .. } => "EVENT_NOT_FOUND",
            AutoOpsError::EventAlreadyExists { .. } => "EVENT_ALREADY_EXISTS",
            AutoOpsError::ReasonTooShort { .. } => "REASON_TOO_SHORT",
            AutoOpsError::SelectionOutOfRange { .. } => "SELECTION_OUT_OF_RANGE",
            AutoOpsError::InvalidFilter { .. } => "INVALID_FILTER",
            AutoOpsError::InvalidIntake { .. } => "INVALID_INTAKE",
            AutoOpsError::NoDecision { .. } => "NO_DECISION",
            AutoOpsError::InvalidDecision { .. } => "INVALID_DECISION",
            AutoOpsError::SupervisorUnavailable => "SUPERVISOR_UNAVAILABLE",
            AutoOpsError::SupervisorFailed { .. } => "SUPERVISOR_FAILED",
            AutoOpsError::JsonError(_) => "JSON_ERROR",
            AutoOpsError::StoreLocked => "STORE_LOCKED",
            AutoOpsError::IoError { .. } => "IO_ERROR",
            AutoOpsError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client sent invalid data
            AutoOpsError::ReasonTooShort { .. }
            | AutoOpsError::SelectionOutOfRange { .. }
            | AutoOpsError::InvalidFilter { .. }
            | AutoOpsError::InvalidIntake { .. } => 400,

            // 404 Not Found
            AutoOpsError::EventNotFound { .. } => 404,

            // 409 Conflict - Resource state conflict
            AutoOpsError::EventAlreadyExists { .. }
            | AutoOpsError::NoDecision { .. } => 409,

            // 422 Unprocessable Entity
            AutoOpsError::InvalidDecision { .. } => 422,

            // 500 Internal Server Error
            AutoOpsError::StoreLocked | AutoOpsError::InternalError { .. } => 500,

            // 502 Bad Gateway - External dependency failed
            AutoOpsError::SupervisorFailed { .. }
            | AutoOpsError::JsonError(_)
            | AutoOpsError::IoError { .. } => 502,

            // 503 Service Unavailable
            AutoOpsError::SupervisorUnavailable => 503,
        }
    }

    /// Converts this error to a JSON-serializable response object
    ///
    /// ```json
    /// {
    ///   "error": {
    ///     "code": "EVENT_NOT_FOUND",
    ///     "message": "Event not found: 'E404'",
    ///     "category": "not_found",
    ///     "recoverable": false
    ///   }
    /// }
    /// ```
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                recoverable: self.is_recoverable(),
            },
        }
    }
}

/// JSON-serializable error response for APIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail for JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g., "EVENT_NOT_FOUND")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category
    pub category: ErrorCategory,
    /// Whether retry might succeed
    pub recoverable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_recoverable() {
        assert!(AutoOpsError::StoreLocked.is_recoverable());
        assert!(AutoOpsError::SupervisorFailed {
            reason: "timeout".to_string()
        }
        .is_recoverable());
        assert!(!AutoOpsError::EventNotFound {
            event_id: "E1".to_string()
        }
        .is_recoverable());
        assert!(!AutoOpsError::ReasonTooShort {
            minimum: 10,
            actual: 3
        }
        .is_recoverable());
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            AutoOpsError::EventNotFound {
                event_id: "E1".to_string()
            }
            .http_status_code(),
            404
        );
        assert_eq!(
            AutoOpsError::ReasonTooShort {
                minimum: 10,
                actual: 9
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            AutoOpsError::NoDecision {
                event_id: "E1".to_string()
            }
            .http_status_code(),
            409
        );
        assert_eq!(AutoOpsError::SupervisorUnavailable.http_status_code(), 503);
        assert_eq!(AutoOpsError::StoreLocked.http_status_code(), 500);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            AutoOpsError::SelectionOutOfRange {
                index: 4,
                available: 2
            }
            .category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            AutoOpsError::InvalidDecision {
                reason: "two selected".to_string()
            }
            .category(),
            ErrorCategory::Integrity
        );
    }

    #[test]
    fn test_is_client_server_error() {
        let client_err = AutoOpsError::EventNotFound {
            event_id: "E1".to_string(),
        };
        assert!(client_err.is_client_error());
        assert!(!client_err.is_server_error());

        let server_err = AutoOpsError::StoreLocked;
        assert!(!server_err.is_client_error());
        assert!(server_err.is_server_error());
    }

    #[test]
    fn test_error_response_serialization() {
        let err = AutoOpsError::EventNotFound {
            event_id: "E404".to_string(),
        };
        let json = serde_json::to_string_pretty(&err.to_error_response()).unwrap();
        assert!(json.contains("EVENT_NOT_FOUND"));
        assert!(json.contains("E404"));
        assert!(json.contains("not_found"));

        let parsed: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.error.code, "EVENT_NOT_FOUND");
        assert!(!parsed.error.recoverable);
    }
}
