//! Error types for Reelcut.

use thiserror::Error;

/// Main error type for Reelcut operations.
#[derive(Error, Debug)]
pub enum ReelcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Dimension mismatch: expected {expected} bytes, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Reelcut operations.
pub type Result<T> = std::result::Result<T, ReelcutError>;
