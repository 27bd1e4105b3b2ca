//! Error types for bqbot-link.
//!
//! The two-tier split the runner relies on: errors the warehouse itself
//! reported (`ServiceError`, `JobError`) versus everything else (transport,
//! serialization, configuration). Callers check `is_service_error()` instead
//! of matching on an exception hierarchy.

use std::fmt;

/// Result type for link operations
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors that can occur while talking to BigQuery
#[derive(Debug)]
pub enum LinkError {
    /// The service rejected the request (quota, SQL syntax, permission, ...)
    ServiceError { status_code: u16, message: String },

    /// The job completed but reported an error result
    JobError { reason: String, message: String },

    /// Transport-level failure (DNS, TLS, connection reset, ...)
    NetworkError(String),

    /// Response body could not be decoded
    SerializationError(String),

    /// Client was misconfigured (empty project id, bad base URL, ...)
    ConfigurationError(String),

    /// No usable credentials
    AuthenticationError(String),
}

impl LinkError {
    /// True when the warehouse itself reported the failure, as opposed to a
    /// local or transport problem. The runner prints these under a different
    /// prefix.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            LinkError::ServiceError { .. } | LinkError::JobError { .. }
        )
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::ServiceError {
                status_code,
                message,
            } => write!(f, "service error ({}): {}", status_code, message),
            LinkError::JobError { reason, message } => {
                write!(f, "job failed ({}): {}", reason, message)
            }
            LinkError::NetworkError(msg) => write!(f, "network error: {}", msg),
            LinkError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            LinkError::ConfigurationError(msg) => write!(f, "configuration error: {}", msg),
            LinkError::AuthenticationError(msg) => write!(f, "authentication error: {}", msg),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<reqwest::Error> for LinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LinkError::SerializationError(err.to_string())
        } else {
            LinkError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        LinkError::SerializationError(err.to_string())
    }
}
