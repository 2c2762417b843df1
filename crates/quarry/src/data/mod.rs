//! Core value types: extractions, documents, and few-shot examples.

mod document;
mod extraction;

pub use document::{AnnotatedDocument, Document, ExampleData};
pub use extraction::{AlignmentStatus, CharInterval, Extraction};
