//! Extraction types and their source-grounding metadata.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A half-open `[start_pos, end_pos)` byte range into the source text.
///
/// Offsets always fall on UTF-8 character boundaries, so the interval can be
/// used to slice the source string directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharInterval {
    /// Start of the span (inclusive).
    pub start_pos: usize,
    /// End of the span (exclusive).
    pub end_pos: usize,
}

impl CharInterval {
    /// Create a new interval.
    pub fn new(start_pos: usize, end_pos: usize) -> Self {
        Self { start_pos, end_pos }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end_pos.saturating_sub(self.start_pos)
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.end_pos <= self.start_pos
    }

    /// Whether two intervals share at least one position.
    pub fn overlaps(&self, other: &CharInterval) -> bool {
        self.start_pos < other.end_pos && other.start_pos < self.end_pos
    }

    /// Slice the given text with this interval.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start_pos..self.end_pos)
    }
}

/// How an extraction was matched back to the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStatus {
    /// Byte-for-byte match of the extraction text.
    MatchExact,
    /// Case- or whitespace-insensitive token match.
    MatchLesser,
    /// Token-similarity match above the fuzzy threshold.
    MatchFuzzy,
}

impl AlignmentStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AlignmentStatus::MatchExact => "Exact",
            AlignmentStatus::MatchLesser => "Lesser",
            AlignmentStatus::MatchFuzzy => "Fuzzy",
        }
    }
}

/// A single piece of information extracted from a document.
///
/// Pairs the extracted text span with its class label, optional attributes,
/// and (after alignment) the position of the span in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Class label (e.g. "diagnosis", "precaution").
    pub extraction_class: String,

    /// The exact text the model extracted.
    pub extraction_text: String,

    /// Optional attribute map. Insertion order is preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<IndexMap<String, String>>,

    /// Position of the span in the source document, when alignment succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_interval: Option<CharInterval>,

    /// How the span was aligned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_status: Option<AlignmentStatus>,

    /// Position of this extraction in the model output for its document.
    #[serde(default)]
    pub extraction_index: usize,

    /// Index of the chunk this extraction came from.
    #[serde(default)]
    pub group_index: usize,
}

impl Extraction {
    /// Create a new extraction with a class and text.
    pub fn new(extraction_class: impl Into<String>, extraction_text: impl Into<String>) -> Self {
        Self {
            extraction_class: extraction_class.into(),
            extraction_text: extraction_text.into(),
            attributes: None,
            char_interval: None,
            alignment_status: None,
            extraction_index: 0,
            group_index: 0,
        }
    }

    /// Add a single attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the attribute map.
    pub fn with_attributes(mut self, attributes: IndexMap<String, String>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Set the aligned source interval and status.
    pub fn with_interval(mut self, interval: CharInterval, status: AlignmentStatus) -> Self {
        self.char_interval = Some(interval);
        self.alignment_status = Some(status);
        self
    }

    /// Whether this extraction was grounded to a source span.
    pub fn is_aligned(&self) -> bool {
        self.char_interval.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_overlap() {
        let a = CharInterval::new(0, 10);
        let b = CharInterval::new(9, 12);
        let c = CharInterval::new(10, 12);

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_interval_slice() {
        let text = "right hip pain";
        let interval = CharInterval::new(6, 9);
        assert_eq!(interval.slice(text), Some("hip"));
    }

    #[test]
    fn test_extraction_builder() {
        let extraction = Extraction::new("precaution", "no flexion past 90 degrees")
            .with_attribute("body_part", "right knee")
            .with_interval(CharInterval::new(4, 30), AlignmentStatus::MatchExact);

        assert_eq!(extraction.extraction_class, "precaution");
        assert!(extraction.is_aligned());
        assert_eq!(
            extraction.attributes.as_ref().unwrap().get("body_part"),
            Some(&"right knee".to_string())
        );
    }

    #[test]
    fn test_attribute_order_preserved() {
        let extraction = Extraction::new("surgery", "R TKA")
            .with_attribute("body_part", "right knee")
            .with_attribute("approach", "total arthroplasty");

        let keys: Vec<&String> = extraction.attributes.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["body_part", "approach"]);
    }

    #[test]
    fn test_serde_skips_unaligned_fields() {
        let extraction = Extraction::new("diagnosis", "femur fracture");
        let json = serde_json::to_string(&extraction).unwrap();

        assert!(!json.contains("char_interval"));
        assert!(!json.contains("alignment_status"));
        assert!(!json.contains("attributes"));
    }
}
