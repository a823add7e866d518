//! Runner error types.

use thiserror::Error;

/// Errors raised while driving, persisting or sweeping packing runs.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Packing failed: {0}")]
    Packing(#[from] gamma_pack_core::Error),

    #[error("Failed to read or write file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid details format: {0}")]
    InvalidFormat(String),
}

/// Result alias for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
