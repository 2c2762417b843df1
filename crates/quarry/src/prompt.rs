//! Few-shot prompt construction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::ExampleData;
use crate::error::{QuarryError, Result};
use crate::resolver;

/// An extraction task: what to extract, demonstrated by examples.
///
/// A template is fully serializable, so a task (description plus few-shot
/// examples) can live in a JSON file and be shared between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Natural-language description of what to extract.
    pub description: String,

    /// Few-shot examples, rendered in insertion order.
    #[serde(default)]
    pub examples: Vec<ExampleData>,
}

impl PromptTemplate {
    /// Create a template with no examples yet.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            examples: Vec::new(),
        }
    }

    /// Add a few-shot example.
    pub fn with_example(mut self, example: ExampleData) -> Self {
        self.examples.push(example);
        self
    }

    /// Add several few-shot examples.
    pub fn with_examples(mut self, examples: Vec<ExampleData>) -> Self {
        self.examples.extend(examples);
        self
    }

    /// Load a task file (JSON with `description` and `examples`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| QuarryError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let reader = BufReader::new(file);
        let template: PromptTemplate = serde_json::from_reader(reader).map_err(|e| {
            QuarryError::Config(format!("Failed to parse task file '{}': {}", path.display(), e))
        })?;

        if template.description.trim().is_empty() {
            return Err(QuarryError::Config(format!(
                "Task file '{}' has an empty description",
                path.display()
            )));
        }

        Ok(template)
    }

    /// Render the full prompt for a piece of text.
    ///
    /// The output is the task description, each example as a Q/A pair with
    /// the answer serialized as fenced JSON, and the target text with an
    /// empty answer slot for the model to fill.
    pub fn render(&self, text: &str, additional_context: Option<&str>) -> Result<String> {
        let mut prompt = String::new();
        prompt.push_str(self.description.trim());
        prompt.push_str("\n\n");

        if let Some(context) = additional_context {
            prompt.push_str(context.trim());
            prompt.push_str("\n\n");
        }

        if !self.examples.is_empty() {
            prompt.push_str("Examples\n");
            for example in &self.examples {
                let answer = resolver::serialize_extractions(&example.extractions)?;
                prompt.push_str(&format!(
                    "Q: {}\nA: ```json\n{}\n```\n\n",
                    example.text.trim(),
                    answer
                ));
            }
        }

        prompt.push_str(&format!("Q: {}\nA: ", text.trim()));
        Ok(prompt)
    }
}

/// System prompt stating the output contract for all extraction calls.
pub fn system_prompt() -> &'static str {
    r#"You are an information extraction engine.

Rules:
- Extract spans of text exactly as they appear in the source. Never paraphrase.
- Assign each span one of the extraction classes described by the task.
- Attach attributes only when the task's examples demonstrate them.
- Extract entities in the order they appear in the text.
- Respond with a single fenced JSON object of the form
  {"extractions": [{"extraction_class": ..., "extraction_text": ..., "attributes": {...}}]}
  and nothing else."#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Extraction;

    fn sample_template() -> PromptTemplate {
        PromptTemplate::new("Extract surgeries and precautions from clinical notes.")
            .with_example(ExampleData::new(
                "s/p R TKA with precautions of WBAT.",
                vec![
                    Extraction::new("surgery", "R TKA").with_attribute("body_part", "right knee"),
                    Extraction::new("precaution", "WBAT"),
                ],
            ))
    }

    #[test]
    fn test_render_contains_examples_and_target() {
        let template = sample_template();
        let prompt = template.render("Patient underwent ORIF of the right hip.", None).unwrap();

        assert!(prompt.starts_with("Extract surgeries and precautions"));
        assert!(prompt.contains("Q: s/p R TKA with precautions of WBAT."));
        assert!(prompt.contains("```json"));
        assert!(prompt.contains("\"extraction_class\": \"surgery\""));
        assert!(prompt.contains("\"body_part\": \"right knee\""));
        assert!(prompt.ends_with("Q: Patient underwent ORIF of the right hip.\nA: "));
    }

    #[test]
    fn test_render_includes_additional_context() {
        let template = sample_template();
        let prompt = template
            .render("Some text.", Some("Notes are from an acute care ward."))
            .unwrap();

        assert!(prompt.contains("acute care ward"));
    }

    #[test]
    fn test_example_answers_omit_alignment_fields() {
        let template = sample_template();
        let prompt = template.render("x", None).unwrap();

        assert!(!prompt.contains("char_interval"));
        assert!(!prompt.contains("extraction_index"));
    }

    #[test]
    fn test_template_roundtrips_through_json() {
        let template = sample_template();
        let json = serde_json::to_string(&template).unwrap();
        let back: PromptTemplate = serde_json::from_str(&json).unwrap();

        assert_eq!(back.description, template.description);
        assert_eq!(back.examples.len(), 1);
        assert_eq!(back.examples[0].extractions[0].extraction_class, "surgery");
    }
}
