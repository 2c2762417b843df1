//! Error types for the Quarry library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Quarry operations.
#[derive(Debug, Error)]
pub enum QuarryError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input text was empty or otherwise unusable.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error talking to an LLM provider.
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Model output could not be resolved into extractions.
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// Error reading or writing annotated documents.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuarryError {
    /// Convenience constructor for provider errors.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for Quarry operations.
pub type Result<T> = std::result::Result<T, QuarryError>;
