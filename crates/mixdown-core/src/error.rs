//! Error types for Mixdown.

use thiserror::Error;

/// Main error type for Mixdown operations.
#[derive(Error, Debug)]
pub enum MixdownError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Resample error: {0}")]
    Resample(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Result type alias for Mixdown operations.
pub type Result<T> = std::result::Result<T, MixdownError>;
