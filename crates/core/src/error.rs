//! Error types for s3pilot-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for s3pilot-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for s3pilot-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    /// Bucket creation failure (anything other than "already owned by you")
    #[error("Failed to create bucket '{name}': {message}")]
    BucketCreate { name: String, message: String },

    /// S3 operation errors
    #[error("S3 operation failed: {0}")]
    S3Operation(String),

    /// Website endpoint lookup failure
    #[error("No website endpoint known for region '{0}'")]
    UnknownRegion(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error during sync
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// Generic SdkError conversion for all S3 operations
impl<E> From<aws_sdk_s3::error::SdkError<E>> for Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: aws_sdk_s3::error::SdkError<E>) -> Self {
        Error::S3Operation(err.to_string())
    }
}

// Builder errors from SDK types with required fields (website configuration)
impl From<aws_smithy_types::error::operation::BuildError> for Error {
    fn from(err: aws_smithy_types::error::operation::BuildError) -> Self {
        Error::InvalidInput(err.to_string())
    }
}
