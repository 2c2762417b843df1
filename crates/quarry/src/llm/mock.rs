//! Mock LLM provider for testing and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::Result;

use super::provider::{LlmProvider, ModelConfig};

/// Mock provider that replays scripted responses.
///
/// Responses are consumed in order, one per `infer` call. When the script
/// runs out (or none was given) every call returns an empty extraction
/// payload, so pipelines keep working end to end without a network.
pub struct MockProvider {
    responses: Mutex<VecDeque<String>>,
    config: ModelConfig,
}

impl MockProvider {
    /// Create a mock that always returns an empty extraction payload.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock that replays the given responses in order.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            config: ModelConfig::for_model("mock"),
        }
    }

    /// Scripted response wrapping extractions the way a real model would.
    pub fn fenced(payload: &str) -> String {
        format!("```json\n{}\n```", payload)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for MockProvider {
    fn infer(&self, _prompt: &str) -> Result<String> {
        let mut responses = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        Ok(responses
            .pop_front()
            .unwrap_or_else(|| Self::fenced(r#"{"extractions": []}"#)))
    }

    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
