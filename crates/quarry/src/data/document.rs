//! Documents, few-shot examples, and annotated results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::extraction::Extraction;

/// A source document to run extraction over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The full document text.
    pub text: String,

    /// Stable identifier. Derived from the text hash when not supplied.
    pub document_id: String,

    /// Extra context passed through to the prompt (e.g. "ICU notes").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

impl Document {
    /// Create a document with an id derived from the text contents.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let document_id = derive_document_id(&text);
        Self {
            text,
            document_id,
            additional_context: None,
        }
    }

    /// Create a document with an explicit id.
    pub fn with_id(text: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            document_id: document_id.into(),
            additional_context: None,
        }
    }

    /// Attach additional prompt context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }
}

/// Derive a stable id from the document text.
fn derive_document_id(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let hex: String = digest.iter().take(4).map(|b| format!("{:02x}", b)).collect();
    format!("doc_{}", hex)
}

/// A few-shot example: sample text plus the extractions the model should
/// produce for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleData {
    /// Example source text.
    pub text: String,

    /// Expected extractions for the text.
    pub extractions: Vec<Extraction>,
}

impl ExampleData {
    /// Create a new few-shot example.
    pub fn new(text: impl Into<String>, extractions: Vec<Extraction>) -> Self {
        Self {
            text: text.into(),
            extractions,
        }
    }
}

/// Extraction results bundled with their source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    /// Identifier of the source document.
    pub document_id: String,

    /// The full source text the extractions are grounded in.
    pub text: String,

    /// Extractions in model output order.
    pub extractions: Vec<Extraction>,

    /// When the extraction was performed.
    pub extracted_at: DateTime<Utc>,
}

impl AnnotatedDocument {
    /// Create an annotated document.
    pub fn new(
        document_id: impl Into<String>,
        text: impl Into<String>,
        extractions: Vec<Extraction>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            text: text.into(),
            extractions,
            extracted_at: Utc::now(),
        }
    }

    /// Extractions that were grounded to a source span.
    pub fn aligned_extractions(&self) -> impl Iterator<Item = &Extraction> {
        self.extractions.iter().filter(|e| e.is_aligned())
    }

    /// Fraction of extractions that were grounded (1.0 when there are none).
    pub fn alignment_ratio(&self) -> f64 {
        if self.extractions.is_empty() {
            return 1.0;
        }
        self.aligned_extractions().count() as f64 / self.extractions.len() as f64
    }
}
