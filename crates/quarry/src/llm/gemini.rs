//! Google Gemini API provider implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::{QuarryError, Result};
use crate::prompt;

use super::provider::{LlmProvider, ModelConfig};

/// Gemini API base endpoint.
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    config: ModelConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ModelConfig::default())
    }

    /// Create a new Gemini provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| QuarryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from environment variable.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_config(ModelConfig::default())
    }

    /// Create from environment variable with custom configuration.
    pub fn from_env_with_config(config: ModelConfig) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            QuarryError::Config("GEMINI_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| QuarryError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }
}

impl LlmProvider for GeminiProvider {
    fn infer(&self, user_prompt: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent", API_BASE, self.config.model);
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": prompt::system_prompt() }]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": user_prompt }]
                }
            ],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_tokens
            }
        });

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| QuarryError::provider("gemini", format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(QuarryError::provider(
                "gemini",
                format!("API error ({}): {}", status, error_text),
            ));
        }

        let api_response: GenerateContentResponse = response.json().map_err(|e| {
            QuarryError::provider("gemini", format!("Failed to parse API response: {}", e))
        })?;

        let text: String = api_response
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(QuarryError::provider(
                "gemini",
                "No text in API response".to_string(),
            ));
        }

        Ok(text)
    }

    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Gemini API response structure.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    // Absent when generation stopped before producing content.
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}
