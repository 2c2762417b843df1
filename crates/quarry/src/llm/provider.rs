//! LLM provider trait and configuration.

use crate::error::Result;

/// Configuration for LLM providers.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model to use (e.g. "gemini-1.5-pro-latest").
    pub model: String,

    /// Maximum tokens in the response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0). Extraction wants it low.
    pub temperature: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-pro-latest".to_string(),
            max_tokens: 4096,
            temperature: 0.3,
        }
    }
}

impl ModelConfig {
    /// Create a config for a specific model with default sampling settings.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations must be thread-safe (Send + Sync) to allow sharing
/// across extraction runs.
pub trait LlmProvider: Send + Sync {
    /// Run inference for a rendered extraction prompt.
    ///
    /// Returns the raw model text; the resolver handles fences and prose.
    fn infer(&self, prompt: &str) -> Result<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ModelConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}
