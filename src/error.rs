//! Error types for the verascan CLI

use thiserror::Error;

/// Result type alias for verascan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to build archive: {0}")]
    Archive(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

/// Veracode API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Check VERA_ID and VERA_KEY.")]
    Unauthorized,

    #[error("Access denied. The API credentials lack permission for this operation.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The service answered with an `<error>` document
    #[error("Veracode rejected the request: {0}")]
    Remote(String),

    #[error("Invalid API credentials: {0}")]
    InvalidCredentials(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required run property was empty at the point it was needed
    #[error("Property {0} was not set. Cannot continue.")]
    MissingRequiredProperty(&'static str),

    #[error("Failed to read credentials file {path}: {reason}")]
    CredentialsFile { path: String, reason: String },
}
