//! Resolving raw model output into extractions.
//!
//! Models are asked for a fenced JSON object, but real responses wrap it in
//! prose, drop the fence, or emit entries with missing fields. The resolver
//! owns the wire format and degrades predictably: fence first, then the
//! outermost brace pair, then (in lenient mode) per-entry skipping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::Extraction;
use crate::error::{QuarryError, Result};

/// Parses model responses into [`Extraction`]s.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    /// When set, entries with missing fields are errors instead of being skipped.
    pub strict: bool,
}

impl Resolver {
    /// Create a lenient resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a raw model response into extractions.
    ///
    /// `extraction_index` is assigned in output order; alignment fields are
    /// left unset for the aligner.
    pub fn resolve(&self, response: &str) -> Result<Vec<Extraction>> {
        let payload = extract_json_payload(response).ok_or_else(|| {
            QuarryError::Resolver("No JSON object found in model response".to_string())
        })?;

        let parsed: WirePayload = serde_json::from_str(payload)
            .map_err(|e| QuarryError::Resolver(format!("Malformed extraction JSON: {}", e)))?;

        let mut extractions = Vec::with_capacity(parsed.extractions.len());
        for (i, entry) in parsed.extractions.into_iter().enumerate() {
            let (class, text) = match (entry.extraction_class, entry.extraction_text) {
                (Some(class), Some(text)) => (class, text),
                _ if self.strict => {
                    return Err(QuarryError::Resolver(format!(
                        "Entry {} is missing extraction_class or extraction_text",
                        i
                    )));
                }
                _ => continue,
            };

            let mut extraction = Extraction::new(class, text);
            if let Some(attributes) = entry.attributes {
                extraction.attributes = Some(stringify_attributes(attributes));
            }
            extraction.extraction_index = extractions.len();
            extractions.push(extraction);
        }

        Ok(extractions)
    }
}

/// Serialize extractions to the wire format used in prompts.
///
/// Only class, text, and attributes are emitted; alignment metadata never
/// reaches the model.
pub fn serialize_extractions(extractions: &[Extraction]) -> Result<String> {
    let wire = WireOutput {
        extractions: extractions
            .iter()
            .map(|e| WireExtractionRef {
                extraction_class: &e.extraction_class,
                extraction_text: &e.extraction_text,
                attributes: e.attributes.as_ref(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&wire)?)
}

/// Pull the JSON payload out of a model response.
///
/// Tries a ```json fence, then a bare ``` fence, then the outermost
/// `{`..`}` pair, then the trimmed response itself.
fn extract_json_payload(response: &str) -> Option<&str> {
    let fenced = if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
    } else if response.contains("```") {
        response.split("```").nth(1)
    } else {
        None
    };

    if let Some(inner) = fenced {
        let inner = inner.trim();
        if !inner.is_empty() {
            return Some(inner);
        }
    }

    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(response[start..=end].trim()),
        _ => {
            let trimmed = response.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        }
    }
}

/// Attribute values arrive as arbitrary JSON; keep strings as-is and render
/// everything else compactly.
fn stringify_attributes(attributes: IndexMap<String, Value>) -> IndexMap<String, String> {
    attributes
        .into_iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, value)
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct WireOutput<'a> {
    extractions: Vec<WireExtractionRef<'a>>,
}

#[derive(Debug, Serialize)]
struct WireExtractionRef<'a> {
    extraction_class: &'a str,
    extraction_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<&'a IndexMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct WirePayload {
    #[serde(default)]
    extractions: Vec<WireExtraction>,
}

#[derive(Debug, Deserialize)]
struct WireExtraction {
    #[serde(default)]
    extraction_class: Option<String>,
    #[serde(default)]
    extraction_text: Option<String>,
    #[serde(default)]
    attributes: Option<IndexMap<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fenced_response() {
        let response = r#"Here are the extractions:
```json
{"extractions": [
  {"extraction_class": "surgery", "extraction_text": "ORIF", "attributes": {"body_part": "right hip"}},
  {"extraction_class": "diagnosis", "extraction_text": "femur fracture"}
]}
```"#;

        let extractions = Resolver::new().resolve(response).unwrap();
        assert_eq!(extractions.len(), 2);
        assert_eq!(extractions[0].extraction_class, "surgery");
        assert_eq!(
            extractions[0].attributes.as_ref().unwrap().get("body_part"),
            Some(&"right hip".to_string())
        );
        assert_eq!(extractions[1].extraction_index, 1);
    }

    #[test]
    fn test_resolve_bare_json_with_prose() {
        let response = r#"Sure! {"extractions": [{"extraction_class": "equipment", "extraction_text": "rolling walker"}]} Hope that helps."#;

        let extractions = Resolver::new().resolve(response).unwrap();
        assert_eq!(extractions.len(), 1);
        assert_eq!(extractions[0].extraction_text, "rolling walker");
    }

    #[test]
    fn test_lenient_skips_incomplete_entries() {
        let response = r#"{"extractions": [
            {"extraction_class": "surgery"},
            {"extraction_class": "equipment", "extraction_text": "cane"}
        ]}"#;

        let extractions = Resolver::new().resolve(response).unwrap();
        assert_eq!(extractions.len(), 1);
        assert_eq!(extractions[0].extraction_text, "cane");
        assert_eq!(extractions[0].extraction_index, 0);
    }

    #[test]
    fn test_strict_rejects_incomplete_entries() {
        let response = r#"{"extractions": [{"extraction_class": "surgery"}]}"#;
        let resolver = Resolver { strict: true };

        assert!(resolver.resolve(response).is_err());
    }

    #[test]
    fn test_non_string_attributes_are_stringified() {
        let response =
            r#"{"extractions": [{"extraction_class": "vital", "extraction_text": "7/10", "attributes": {"scale": 10}}]}"#;

        let extractions = Resolver::new().resolve(response).unwrap();
        assert_eq!(
            extractions[0].attributes.as_ref().unwrap().get("scale"),
            Some(&"10".to_string())
        );
    }

    #[test]
    fn test_empty_response_is_error() {
        assert!(Resolver::new().resolve("").is_err());
        assert!(Resolver::new().resolve("no json here").is_err());
    }

    #[test]
    fn test_serialize_then_resolve() {
        let original = vec![
            Extraction::new("precaution", "TTWB").with_attribute("body_part", "right leg"),
        ];
        let json = serialize_extractions(&original).unwrap();
        let resolved = Resolver::new().resolve(&json).unwrap();

        assert_eq!(resolved[0].extraction_class, "precaution");
        assert_eq!(resolved[0].extraction_text, "TTWB");
        assert_eq!(
            resolved[0].attributes.as_ref().unwrap().get("body_part"),
            Some(&"right leg".to_string())
        );
    }
}
