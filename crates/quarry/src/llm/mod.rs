//! LLM provider integration.
//!
//! Extraction needs exactly one thing from a model: a completion for a
//! rendered prompt. Everything else (prompting, resolution, alignment) is
//! provider-independent, so the trait surface stays small.
//!
//! # Supported Providers
//!
//! - **Gemini** - Google Generative Language API (requires `GEMINI_API_KEY`)
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Ollama** - Local models, no API key needed (requires Ollama installed)
//! - **Mock** - Scripted responses for tests and offline runs

mod gemini;
mod mock;
mod ollama;
mod openai;
mod provider;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use provider::{LlmProvider, ModelConfig};
