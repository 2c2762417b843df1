//! Main Quarry struct and public API.

use std::sync::Arc;

use crate::align::Aligner;
use crate::chunking::{ChunkIterator, TextChunk};
use crate::data::{AnnotatedDocument, Document, Extraction};
use crate::error::{QuarryError, Result};
use crate::llm::LlmProvider;
use crate::prompt::PromptTemplate;
use crate::resolver::Resolver;

/// Configuration for an extraction run.
#[derive(Debug, Clone)]
pub struct QuarryConfig {
    /// Maximum chunk size in bytes fed to the model per call.
    pub max_char_buffer: usize,
    /// Number of extraction passes. Later passes only contribute spans that
    /// do not overlap anything already found.
    pub extraction_passes: usize,
    /// Minimum similarity for fuzzy span alignment (0.0-1.0).
    pub fuzzy_threshold: f64,
    /// Whether malformed model output entries are errors rather than skipped.
    pub strict_resolver: bool,
}

impl Default for QuarryConfig {
    fn default() -> Self {
        Self {
            max_char_buffer: 1000,
            extraction_passes: 1,
            fuzzy_threshold: 0.75,
            strict_resolver: false,
        }
    }
}

/// The main extraction engine.
///
/// Drives the pipeline: chunk the document, render the few-shot prompt,
/// call the model, resolve its output, and align extractions back to
/// source offsets.
pub struct Quarry {
    config: QuarryConfig,
    prompt: PromptTemplate,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl Quarry {
    /// Create an engine for a task with default configuration.
    pub fn new(prompt: PromptTemplate) -> Self {
        Self::with_config(prompt, QuarryConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(prompt: PromptTemplate, config: QuarryConfig) -> Self {
        Self {
            config,
            prompt,
            provider: None,
        }
    }

    /// Set the LLM provider that performs inference.
    pub fn with_provider(mut self, provider: impl LlmProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set a shared, dynamically-typed provider (e.g. chosen at runtime).
    pub fn with_shared_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Run extraction over a piece of text.
    pub fn extract(&self, text: &str) -> Result<AnnotatedDocument> {
        self.extract_document(&Document::new(text))
    }

    /// Run extraction over a document.
    pub fn extract_document(&self, document: &Document) -> Result<AnnotatedDocument> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            QuarryError::Config("No LLM provider configured - call with_provider first".to_string())
        })?;

        if document.text.trim().is_empty() {
            return Err(QuarryError::EmptyInput(format!(
                "Document '{}' has no text to extract from",
                document.document_id
            )));
        }

        let resolver = Resolver {
            strict: self.config.strict_resolver,
        };
        let aligner = Aligner::new(self.config.fuzzy_threshold);
        let chunks: Vec<TextChunk> =
            ChunkIterator::new(&document.text, self.config.max_char_buffer).collect();

        let mut kept: Vec<Extraction> = Vec::new();
        for pass in 0..self.config.extraction_passes.max(1) {
            for (group_index, chunk) in chunks.iter().enumerate() {
                let prompt = self
                    .prompt
                    .render(&chunk.text, document.additional_context.as_deref())?;
                let response = provider.infer(&prompt)?;

                let mut extractions = resolver.resolve(&response)?;
                for extraction in &mut extractions {
                    extraction.group_index = group_index;
                }
                aligner.align_chunk(&mut extractions, &chunk.text, chunk.char_interval.start_pos);

                if pass == 0 {
                    kept.extend(extractions);
                } else {
                    merge_non_overlapping(&mut kept, extractions);
                }
            }
        }

        for (i, extraction) in kept.iter_mut().enumerate() {
            extraction.extraction_index = i;
        }

        Ok(AnnotatedDocument::new(
            document.document_id.clone(),
            document.text.clone(),
            kept,
        ))
    }

    /// Run extraction over several documents in order.
    pub fn extract_documents(&self, documents: &[Document]) -> Result<Vec<AnnotatedDocument>> {
        documents
            .iter()
            .map(|doc| self.extract_document(doc))
            .collect()
    }
}

/// Keep only candidates whose aligned span does not overlap an existing one.
///
/// Unaligned candidates are dropped: without an interval there is no way to
/// tell whether a later pass re-found the same thing.
fn merge_non_overlapping(kept: &mut Vec<Extraction>, candidates: Vec<Extraction>) {
    for candidate in candidates {
        let Some(interval) = candidate.char_interval else {
            continue;
        };
        let overlaps = kept
            .iter()
            .any(|k| k.char_interval.is_some_and(|ki| ki.overlaps(&interval)));
        if !overlaps {
            kept.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CharInterval;
    use crate::llm::MockProvider;

    fn task() -> PromptTemplate {
        PromptTemplate::new("Extract clinical findings.")
    }

    #[test]
    fn test_extract_requires_provider() {
        let quarry = Quarry::new(task());
        let err = quarry.extract("some text").unwrap_err();
        assert!(matches!(err, QuarryError::Config(_)));
    }

    #[test]
    fn test_extract_rejects_empty_text() {
        let quarry = Quarry::new(task()).with_provider(MockProvider::new());
        let err = quarry.extract("   ").unwrap_err();
        assert!(matches!(err, QuarryError::EmptyInput(_)));
    }

    #[test]
    fn test_merge_keeps_non_overlapping_only() {
        let mut kept = vec![
            Extraction::new("a", "x").with_interval(
                CharInterval::new(0, 10),
                crate::data::AlignmentStatus::MatchExact,
            ),
        ];
        let candidates = vec![
            // Overlaps the kept span.
            Extraction::new("b", "y").with_interval(
                CharInterval::new(5, 12),
                crate::data::AlignmentStatus::MatchExact,
            ),
            // Clear of it.
            Extraction::new("c", "z").with_interval(
                CharInterval::new(12, 20),
                crate::data::AlignmentStatus::MatchExact,
            ),
            // Unaligned candidates never merge.
            Extraction::new("d", "w"),
        ];

        merge_non_overlapping(&mut kept, candidates);

        let classes: Vec<&str> = kept.iter().map(|e| e.extraction_class.as_str()).collect();
        assert_eq!(classes, ["a", "c"]);
    }
}
