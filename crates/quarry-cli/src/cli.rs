//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quarry: LLM-backed structured extraction with source grounding
#[derive(Parser)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run extraction over a text file and save annotated results
    Extract {
        /// Path to the input text file ("-" reads stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Task file: JSON with a description and few-shot examples
        #[arg(short, long, value_name = "TASK")]
        task: PathBuf,

        /// LLM provider to use
        #[arg(long, default_value = "gemini")]
        provider: ProviderChoice,

        /// Model to use (provider-specific, e.g. "gpt-4o", "llama3.2")
        #[arg(long)]
        model: Option<String>,

        /// Output path for results (default: <file>.extractions.jsonl)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of extraction passes over the document
        #[arg(long, default_value = "1")]
        passes: usize,

        /// Maximum chunk size in bytes per model call
        #[arg(long, default_value = "1000")]
        max_char_buffer: usize,
    },

    /// Render saved results as a standalone HTML visualization
    Visualize {
        /// Path to a results file (JSONL)
        #[arg(value_name = "JSONL")]
        file: PathBuf,

        /// Output path for the HTML file (default: <file>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the visualization in a browser
        #[arg(long)]
        open: bool,
    },

    /// Show a summary of saved extraction results
    Status {
        /// Path to a results file (JSONL)
        #[arg(value_name = "JSONL")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// LLM provider choice for extraction
#[derive(Clone, Debug, Default)]
pub enum ProviderChoice {
    /// Google Gemini API (requires GEMINI_API_KEY)
    #[default]
    Gemini,
    /// OpenAI GPT API (requires OPENAI_API_KEY)
    OpenAi,
    /// Ollama local models (requires Ollama running)
    Ollama,
    /// Mock provider for testing
    Mock,
}

impl std::str::FromStr for ProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderChoice::Gemini),
            "openai" | "gpt" => Ok(ProviderChoice::OpenAi),
            "ollama" | "local" => Ok(ProviderChoice::Ollama),
            "mock" | "test" => Ok(ProviderChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: gemini, openai, ollama, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderChoice::Gemini => write!(f, "gemini"),
            ProviderChoice::OpenAi => write!(f, "openai"),
            ProviderChoice::Ollama => write!(f, "ollama"),
            ProviderChoice::Mock => write!(f, "mock"),
        }
    }
}
