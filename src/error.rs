//! Error types for the playlist sorter.

use thiserror::Error;

/// Main error type for every step of a sort run.
#[derive(Debug, Error)]
pub enum Error {
    /// Application identity is missing or was rejected by the provider.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The stored bearer token was rejected; the run has to restart from authorization.
    #[error("Login expired")]
    CredentialExpired,

    /// The user supplied something we cannot work with.
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Authorization code could not be turned into a token.
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// The remote API answered with an unexpected status.
    #[error("Request to {url} failed with status {status}: {message}")]
    Remote {
        url: String,
        status: u16,
        message: String,
    },

    /// HTTP request failed before a response arrived.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cover image could not be decoded or re-encoded.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// True for errors the operator fixes in the developer dashboard.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type alias for sortify operations.
pub type Res<T> = std::result::Result<T, Error>;
