//! # Error Types
//!
//! Semantic error types for the relay client. The controller only ever
//! surfaces two kinds to the user: [`RelayError::Validation`] for an empty
//! submission and [`RelayError::Request`] for a failed or rejected POST.
//! The remaining variants cover configuration and protocol plumbing.

use thiserror::Error;

/// Convenient Result alias for relay operations.
pub type RelayResult<T> = std::result::Result<T, RelayError>;

/// Text used when a non-2xx response carries no usable `error` field.
pub const DEFAULT_REQUEST_ERROR: &str = "Request failed";

/// All errors that can occur when talking to the relay service.
#[derive(Error, Debug)]
pub enum RelayError {
    // ─── Submission ─────────────────────────────────────────────────
    /// The submitted message was empty after trimming.
    #[error("{reason}")]
    Validation { reason: String },

    /// The POST failed: non-2xx status, network failure, or an unusable body.
    ///
    /// `message` is the server-supplied error text when there is one.
    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    // ─── Connection ─────────────────────────────────────────────────
    /// The HTTP client could not be built for the configured URL.
    #[error("Failed to set up relay client for {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    // ─── Protocol ───────────────────────────────────────────────────
    /// Received an unexpected or malformed payload from the relay.
    #[error("Protocol error: {reason}")]
    Protocol { reason: String },

    // ─── Config ─────────────────────────────────────────────────────
    /// Configuration file error (missing, malformed, or invalid values).
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // ─── I/O ────────────────────────────────────────────────────────
    /// Filesystem or I/O error (config file reading, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelayError {
    /// Build the error for an empty submission.
    pub fn empty_message() -> Self {
        RelayError::Validation {
            reason: "Please provide a message.".into(),
        }
    }

    /// Build a request error from a non-2xx response.
    ///
    /// Falls back to [`DEFAULT_REQUEST_ERROR`] when the server sent no
    /// (or an empty) error string. Whitespace is passed through as sent.
    pub fn rejected(status: u16, server_error: Option<String>) -> Self {
        let message = server_error
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_REQUEST_ERROR.to_string());
        RelayError::Request {
            status: Some(status),
            message,
        }
    }

    /// Returns `true` for an empty-input rejection.
    pub fn is_validation(&self) -> bool {
        matches!(self, RelayError::Validation { .. })
    }

    /// Returns `true` if the submission reached (or tried to reach) the server
    /// and failed there.
    pub fn is_request_error(&self) -> bool {
        matches!(self, RelayError::Request { .. })
    }

    /// HTTP status attached to a request error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RelayError::Request { status, .. } => *status,
            _ => None,
        }
    }

    /// Text shown in the transient feedback banner.
    pub fn banner_text(&self) -> String {
        match self {
            RelayError::Validation { reason } => reason.clone(),
            RelayError::Request { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ─── From impls for external error types ────────────────────────────────

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Request {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "config-toml")]
impl From<toml::de::Error> for RelayError {
    fn from(err: toml::de::Error) -> Self {
        RelayError::Config {
            reason: err.to_string(),
        }
    }
}
