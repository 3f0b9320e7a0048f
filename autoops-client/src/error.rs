//! Error types for the AutoOps client

use autoops_core::AutoOpsError;
use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Broad class of a client error, as surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected locally, no request issued
    Validation,
    /// Transport failure or unsuccessful read
    Network,
    /// Unknown event
    NotFound,
    /// Non-2xx response to an override
    Server,
    /// Anything else
    Other,
}

/// Errors that can occur in the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Input failed local validation
    #[error("{0}")]
    Validation(String),

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Event ID unknown to the server
    #[error("Event not found: {0}")]
    NotFound(String),

    /// Server rejected the request
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An override for this event is already in flight
    #[error("An override for event '{0}' is already being submitted")]
    SubmitInProgress(String),

    /// Operation not allowed in the workflow's current state
    #[error("Invalid override state: {0}")]
    InvalidState(String),

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Server { .. } => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }

    /// Whether a read may be retried after this error
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<AutoOpsError> for ClientError {
    fn from(err: AutoOpsError) -> Self {
        match err {
            AutoOpsError::EventNotFound { event_id } => ClientError::NotFound(event_id),
            AutoOpsError::ReasonTooShort { .. } => ClientError::Validation(err.to_string()),
            AutoOpsError::InvalidDecision { .. } => {
                ClientError::MalformedResponse(err.to_string())
            }
            other => ClientError::Server {
                status: other.http_status_code(),
                message: other.to_string(),
            },
        }
    }
}
