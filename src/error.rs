//! Error types for the mission strategy engine

use std::time::Duration;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {

    // =============================
    // Request Errors
    // =============================

    #[error("Validation error: {0}")]
    Validation(String),

    // =============================
    // Pipeline Outcomes
    // =============================

    #[error("No strategies matched the mission parameters")]
    EmptyResult,

    #[error("Pipeline fault: {0}")]
    PipelineFault(String),

    #[error("Recommendation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request {request_id} was superseded by a newer submission")]
    Superseded { request_id: u64 },

    // =============================
    // Configuration
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EngineError {
    /// Whether resetting the orchestrator back to idle clears this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyResult
                | EngineError::PipelineFault(_)
                | EngineError::Timeout(_)
                | EngineError::Superseded { .. }
        )
    }
}
