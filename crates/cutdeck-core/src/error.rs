//! Error types for Cutdeck.

use thiserror::Error;

/// Main error type for Cutdeck operations outside the editing core.
#[derive(Error, Debug)]
pub enum CutdeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for CutdeckError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type alias for Cutdeck operations.
pub type Result<T> = std::result::Result<T, CutdeckError>;
