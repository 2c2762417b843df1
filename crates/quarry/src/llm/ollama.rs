//! Ollama local LLM provider implementation.
//!
//! Ollama allows running extraction against local models without API keys.
//! Install from: https://ollama.ai

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{QuarryError, Result};
use crate::prompt;

use super::provider::{LlmProvider, ModelConfig};

/// Default Ollama API endpoint.
const DEFAULT_API_URL: &str = "http://localhost:11434/api/chat";

/// Ollama local LLM provider.
pub struct OllamaProvider {
    client: Client,
    api_url: String,
    config: ModelConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses llama3.2 by default. Make sure you've pulled it:
    /// `ollama pull llama3.2`
    pub fn new() -> Result<Self> {
        Self::with_config(ModelConfig::for_model("llama3.2"))
    }

    /// Create with a specific model.
    pub fn with_model(model: impl Into<String>) -> Result<Self> {
        Self::with_config(ModelConfig::for_model(model))
    }

    /// Create with custom configuration.
    pub fn with_config(config: ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // Local models can be slow
            .build()
            .map_err(|e| QuarryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_url = std::env::var("OLLAMA_HOST")
            .map(|host| format!("{}/api/chat", host.trim_end_matches('/')))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            client,
            api_url,
            config,
        })
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

impl LlmProvider for OllamaProvider {
    fn infer(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens
            },
            "messages": [
                {
                    "role": "system",
                    "content": prompt::system_prompt()
                },
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    QuarryError::provider(
                        "ollama",
                        "Failed to connect to Ollama. Is it running? Start with: ollama serve"
                            .to_string(),
                    )
                } else {
                    QuarryError::provider("ollama", format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(QuarryError::provider(
                "ollama",
                format!("API error ({}): {}", status, error_text),
            ));
        }

        let api_response: ChatResponse = response.json().map_err(|e| {
            QuarryError::provider("ollama", format!("Failed to parse API response: {}", e))
        })?;

        if api_response.message.content.is_empty() {
            return Err(QuarryError::provider(
                "ollama",
                "Empty response from model".to_string(),
            ));
        }

        Ok(api_response.message.content)
    }

    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}
