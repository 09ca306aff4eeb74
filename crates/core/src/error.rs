//! Error types for lexlink.
//!
//! One error enum covers every failure category: configuration, I/O,
//! upstream providers, model output parsing and missing request input.

use thiserror::Error;

/// Unified error type for lexlink.
///
/// Every fallible function returns `Result<T, AppError>`. The HTTP layer
/// decides which variants are surfaced to callers; everything else is only
/// logged.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search providers, glossary service and other remote APIs
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// LLM and embedding provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Document loading, indexing and retrieval errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Model output that does not match the expected structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required request input was not supplied
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
