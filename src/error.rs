//! Error types for spatial-synth

use thiserror::Error;

/// Main error type for spatial-synth operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unusable generation configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input that violates a documented constraint
    #[error("Validation error: {0}")]
    Validation(String),

    /// Recognized request for a model or method this crate does not implement
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Tabular source is missing required columns or holds malformed values
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for spatial-synth operations
pub type Result<T> = std::result::Result<T, Error>;
