/// Unified error types for the Linkdeck client
use thiserror::Error;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Error response from the backend API, already normalized to a
    /// human-readable message
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication errors (state mismatch, missing session)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Client-side validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup of a record that is not in local state
    #[error("Not found: {0}")]
    NotFound(String),

    /// Session storage backend errors
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Display string for store-level error reporting
    pub fn display_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
