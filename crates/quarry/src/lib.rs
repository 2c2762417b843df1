//! Quarry: LLM-backed structured information extraction with source grounding.
//!
//! Quarry turns free text into structured, source-grounded extractions: a
//! task is described once (a prompt description plus few-shot examples), a
//! language model proposes extractions, and every extraction is aligned back
//! to the exact character span it came from.
//!
//! # Core Principles
//!
//! - **Grounded**: every extraction carries the source interval it matched
//! - **Non-destructive**: the source text is never modified, only annotated
//! - **Model-agnostic**: providers are pluggable behind a small trait
//!
//! # Example
//!
//! ```no_run
//! use quarry::{ExampleData, Extraction, PromptTemplate, Quarry};
//! use quarry::llm::GeminiProvider;
//!
//! let task = PromptTemplate::new("Extract surgeries and precautions.")
//!     .with_example(ExampleData::new(
//!         "s/p R TKA, WBAT.",
//!         vec![
//!             Extraction::new("surgery", "R TKA"),
//!             Extraction::new("precaution", "WBAT"),
//!         ],
//!     ));
//!
//! let quarry = Quarry::new(task).with_provider(GeminiProvider::from_env().unwrap());
//! let result = quarry.extract("Patient underwent ORIF of the right hip.").unwrap();
//!
//! println!("Extractions: {}", result.extractions.len());
//! ```

pub mod align;
pub mod chunking;
pub mod data;
pub mod error;
pub mod io;
pub mod llm;
pub mod prompt;
pub mod resolver;
pub mod tokenizer;
pub mod visualize;

mod quarry;

pub use crate::quarry::{Quarry, QuarryConfig};
pub use data::{AlignmentStatus, AnnotatedDocument, CharInterval, Document, ExampleData, Extraction};
pub use error::{QuarryError, Result};
pub use prompt::PromptTemplate;
pub use resolver::Resolver;
