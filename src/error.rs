//! Error types for the calibration engine

use thiserror::Error;

/// Engine-wide error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// Structurally invalid training input (empty or length-mismatched arrays)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Too few samples to fit a calibration transform
    #[error("insufficient data: {got} samples, need at least {need}")]
    InsufficientData { got: usize, need: usize },

    /// Artifact file I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed persisted artifact; propagated to the caller, who owns
    /// retry/fallback policy
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
