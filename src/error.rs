//! Error types for testgrid-artifacts
//!
//! Every failure in the crate funnels into [`Error`]. Nothing is retried or
//! reclassified on the way up: the run boundary prints the error's display
//! text as the step's single failure message, so variants that wrap an
//! underlying failure display it verbatim.

use std::path::Path;
use thiserror::Error;

/// Result type alias for testgrid-artifacts operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for testgrid-artifacts
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing step input, detected before any remote call
    #[error("{message}")]
    Config {
        /// Human-readable message, shown to the user as-is
        message: String,
        /// The input that caused the error (e.g., "mode")
        key: Option<String>,
    },

    /// The catalog API rejected a request
    ///
    /// Displays the API's own message so it reaches the user unchanged.
    #[error("{message}")]
    Remote {
        /// Error code reported by the API (e.g., "ArgumentException")
        code: String,
        /// Message reported by the API
        message: String,
        /// HTTP status of the failed call
        status: u16,
    },

    /// No AWS credentials were available for a signed request
    #[error("Could not load credentials from any providers: {0}")]
    Credentials(String),

    /// An artifact URL answered with a non-success status
    #[error("Request failed with status code {status} for {url}")]
    Fetch {
        /// HTTP status returned by the content URL
        status: u16,
        /// The URL that was fetched
        url: String,
    },

    /// A session ARN did not carry the `<project-id>/<session-id>` suffix
    #[error("invalid session ARN: {0}")]
    InvalidArn(String),

    /// Network error
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// I/O error (directory creation, file write)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization error (request/response bodies, selenium properties)
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a configuration error for the named input
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Build an I/O error annotated with the path it concerns
    ///
    /// The message keeps the OS error text first so the run's failure message
    /// still reads like the underlying failure.
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        let kind = err.kind();
        Error::Io(std::io::Error::new(
            kind,
            format!("{err}, path '{}'", path.display()),
        ))
    }

    /// Machine-readable classification, used as a structured logging field
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Remote { .. } => "remote_error",
            Error::Credentials(_) => "credentials_error",
            Error::Fetch { .. } => "fetch_error",
            Error::InvalidArn(_) => "invalid_arn",
            Error::Network(_) => "network_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}
