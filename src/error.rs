//! Error types for the ShotAPI client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the screenshot service
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP call could not complete (connect, DNS, body read)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a status outside 200-299
    #[error("API Error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Directory creation or file write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A capture option failed local validation
    #[error("Invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },

    /// The base API URL could not be parsed
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Output filenames must be a single plain path component
    #[error("Invalid output filename: {0}")]
    InvalidFilename(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A JSON endpoint returned a body we could not decode
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl Error {
    /// HTTP status carried by an API failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn invalid_option(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidOption {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
