//! Extract command - run a task over a text file and save results.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use quarry::llm::{GeminiProvider, LlmProvider, MockProvider, ModelConfig, OllamaProvider, OpenAiProvider};
use quarry::{io, PromptTemplate, Quarry, QuarryConfig};

use crate::cli::ProviderChoice;

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    task: PathBuf,
    provider: ProviderChoice,
    model: Option<String>,
    output: Option<PathBuf>,
    passes: usize,
    max_char_buffer: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let from_stdin = file.as_os_str() == "-";
    let text = if from_stdin {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }
        std::fs::read_to_string(&file)?
    };

    let template = PromptTemplate::from_file(&task)?;

    let source_label = if from_stdin {
        "stdin".to_string()
    } else {
        file.display().to_string()
    };
    println!(
        "{} {} ({} provider, {} example{})",
        "Extracting".cyan().bold(),
        source_label.white(),
        provider,
        template.examples.len(),
        if template.examples.len() == 1 { "" } else { "s" }
    );

    let config = QuarryConfig {
        max_char_buffer,
        extraction_passes: passes,
        ..QuarryConfig::default()
    };
    let llm = build_provider(&provider, model.as_deref())?;
    if verbose {
        println!("Model: {}", llm.config().model);
    }

    let quarry = Quarry::with_config(template, config).with_shared_provider(llm);
    let result = quarry.extract(&text)?;

    let mut by_class: BTreeMap<&str, usize> = BTreeMap::new();
    for extraction in &result.extractions {
        *by_class.entry(extraction.extraction_class.as_str()).or_insert(0) += 1;
    }

    println!(
        "Found {} extractions ({:.0}% aligned to the source)",
        result.extractions.len().to_string().white().bold(),
        result.alignment_ratio() * 100.0
    );
    if verbose {
        for (class, count) in &by_class {
            println!("  {:24} {}", class, count);
        }
    }

    let output_path = output.unwrap_or_else(|| {
        if from_stdin {
            PathBuf::from("extractions.jsonl")
        } else {
            io::annotated_path(&file)
        }
    });
    io::save_annotated_documents(&output_path, &[result])?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );
    println!(
        "Run {} to inspect the results",
        format!("quarry visualize {}", output_path.display())
            .cyan()
            .bold()
    );

    Ok(())
}

/// Build the chosen provider, honoring a model override.
fn build_provider(
    choice: &ProviderChoice,
    model: Option<&str>,
) -> Result<Arc<dyn LlmProvider>, Box<dyn std::error::Error>> {
    let provider: Arc<dyn LlmProvider> = match choice {
        ProviderChoice::Gemini => Arc::new(match model {
            Some(m) => GeminiProvider::from_env_with_config(ModelConfig::for_model(m))?,
            None => GeminiProvider::from_env()?,
        }),
        ProviderChoice::OpenAi => Arc::new(match model {
            Some(m) => OpenAiProvider::from_env_with_config(ModelConfig::for_model(m))?,
            None => OpenAiProvider::from_env()?,
        }),
        ProviderChoice::Ollama => Arc::new(match model {
            Some(m) => OllamaProvider::with_model(m)?,
            None => OllamaProvider::new()?,
        }),
        ProviderChoice::Mock => Arc::new(MockProvider::new()),
    };
    Ok(provider)
}
