//! Error types for bqbot-cli
//!
//! Provides user-friendly error messages for the two failure tiers: fatal
//! startup errors (missing project id, failed connection) and per-step
//! errors that the runner logs and converts into boolean outcomes.

use bqbot_link::LinkError;
use std::fmt;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CLIError>;

/// Errors that can occur in the CLI
#[derive(Debug)]
pub enum CLIError {
    /// Error from the bqbot-link library
    LinkError(LinkError),

    /// Configuration file or project-id resolution error
    ConfigurationError(String),

    /// File I/O error
    FileError(String),

    /// Interactive input error
    InputError(String),
}

impl fmt::Display for CLIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CLIError::LinkError(e) => write!(f, "{}", e),
            CLIError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            CLIError::FileError(msg) => write!(f, "File error: {}", msg),
            CLIError::InputError(msg) => write!(f, "Input error: {}", msg),
        }
    }
}

impl std::error::Error for CLIError {}

impl From<LinkError> for CLIError {
    fn from(err: LinkError) -> Self {
        CLIError::LinkError(err)
    }
}

impl From<std::io::Error> for CLIError {
    fn from(err: std::io::Error) -> Self {
        CLIError::FileError(err.to_string())
    }
}

impl From<toml::de::Error> for CLIError {
    fn from(err: toml::de::Error) -> Self {
        CLIError::ConfigurationError(format!("TOML parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CLIError::ConfigurationError("Project ID is required".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: Project ID is required"
        );

        let err = CLIError::FileError("no such file".into());
        assert_eq!(err.to_string(), "File error: no such file");
    }

    #[test]
    fn test_link_error_passthrough() {
        let err: CLIError = LinkError::ServiceError {
            status_code: 400,
            message: "Syntax error at [1:1]".into(),
        }
        .into();
        assert_eq!(err.to_string(), "service error (400): Syntax error at [1:1]");
    }
}
