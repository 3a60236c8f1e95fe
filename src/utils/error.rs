// src/utils/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid step {step}: expected a value in 0..={max_step}")]
    InvalidStep { step: usize, max_step: usize },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Matrix is singular")]
    SingularMatrix,

    #[error("Corrupt session state: {0}")]
    CorruptSnapshot(String),

    #[error("No active session")]
    NoSession,

    #[error("Entropy error: {0}")]
    Entropy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Errors caused by what the caller sent, as opposed to engine faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput(_)
                | EngineError::InvalidStep { .. }
                | EngineError::CorruptSnapshot(_)
                | EngineError::NoSession
                | EngineError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
