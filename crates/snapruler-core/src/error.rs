//! Errors raised at the fallible edges of the engine (configuration and
//! script loading). Drawing operations themselves never fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapRulerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible engine operations.
pub type Result<T> = std::result::Result<T, SnapRulerError>;
