//! Aligning extracted text back to source offsets.
//!
//! The model returns snippets, not positions. Alignment searches the source
//! chunk for each snippet and records where it came from: exact byte match
//! first, then a case-insensitive token match, then the best fuzzy token
//! window. A search cursor moves forward on each hit so repeated snippets
//! resolve to successive occurrences.

use strsim::normalized_levenshtein;

use crate::data::{AlignmentStatus, CharInterval, Extraction};
use crate::tokenizer::{self, Token};

/// Aligns extractions against chunk text.
#[derive(Debug, Clone)]
pub struct Aligner {
    /// Minimum normalized similarity for a fuzzy match (0.0-1.0).
    pub fuzzy_threshold: f64,
}

impl Default for Aligner {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.75,
        }
    }
}

impl Aligner {
    /// Create an aligner with a custom fuzzy threshold.
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self {
            fuzzy_threshold: fuzzy_threshold.clamp(0.0, 1.0),
        }
    }

    /// Align extractions in place against one chunk of the document.
    ///
    /// `chunk_offset` is the chunk's byte position in the full document;
    /// recorded intervals are document-relative. Extractions that cannot be
    /// matched keep `char_interval = None`.
    pub fn align_chunk(&self, extractions: &mut [Extraction], chunk_text: &str, chunk_offset: usize) {
        let tokens = tokenizer::tokenize(chunk_text);
        let lower_tokens: Vec<String> = tokens
            .iter()
            .map(|t| t.text(chunk_text).to_lowercase())
            .collect();

        let mut cursor = 0usize;

        for extraction in extractions.iter_mut() {
            let needle = extraction.extraction_text.trim();
            if needle.is_empty() {
                continue;
            }

            if let Some(interval) = find_exact(chunk_text, needle, cursor) {
                cursor = interval.end_pos;
                extraction.char_interval = Some(offset_interval(interval, chunk_offset));
                extraction.alignment_status = Some(AlignmentStatus::MatchExact);
                continue;
            }

            let needle_tokens: Vec<String> = tokenizer::tokenize(needle)
                .iter()
                .map(|t| t.text(needle).to_lowercase())
                .collect();
            if needle_tokens.is_empty() || needle_tokens.len() > tokens.len() {
                continue;
            }

            let token_cursor = tokens
                .iter()
                .position(|t| t.interval.start_pos >= cursor)
                .unwrap_or(tokens.len());

            if let Some(interval) =
                find_token_sequence(&tokens, &lower_tokens, &needle_tokens, token_cursor)
            {
                cursor = interval.end_pos;
                extraction.char_interval = Some(offset_interval(interval, chunk_offset));
                extraction.alignment_status = Some(AlignmentStatus::MatchLesser);
                continue;
            }

            if let Some(interval) = self.find_fuzzy(&tokens, &lower_tokens, &needle_tokens) {
                cursor = interval.end_pos;
                extraction.char_interval = Some(offset_interval(interval, chunk_offset));
                extraction.alignment_status = Some(AlignmentStatus::MatchFuzzy);
            }
        }
    }

    /// Best token window of the needle's size by normalized similarity.
    fn find_fuzzy(
        &self,
        tokens: &[Token],
        lower_tokens: &[String],
        needle_tokens: &[String],
    ) -> Option<CharInterval> {
        let n = needle_tokens.len();
        let needle_joined = needle_tokens.join(" ");

        let mut best: Option<(f64, CharInterval)> = None;
        for i in 0..=(lower_tokens.len() - n) {
            let window_joined = lower_tokens[i..i + n].join(" ");
            let score = normalized_levenshtein(&window_joined, &needle_joined);
            if score >= self.fuzzy_threshold
                && best.map_or(true, |(best_score, _)| score > best_score)
            {
                best = Some((
                    score,
                    CharInterval::new(
                        tokens[i].interval.start_pos,
                        tokens[i + n - 1].interval.end_pos,
                    ),
                ));
            }
        }

        best.map(|(_, interval)| interval)
    }
}

/// Exact byte search, preferring matches at or after the cursor.
fn find_exact(haystack: &str, needle: &str, cursor: usize) -> Option<CharInterval> {
    let from_cursor = haystack
        .get(cursor..)
        .and_then(|tail| tail.find(needle).map(|i| cursor + i));

    from_cursor
        .or_else(|| haystack.find(needle))
        .map(|start| CharInterval::new(start, start + needle.len()))
}

/// Case-insensitive token sequence search, preferring matches at or after
/// the token cursor and wrapping to the chunk start.
fn find_token_sequence(
    tokens: &[Token],
    lower_tokens: &[String],
    needle_tokens: &[String],
    token_cursor: usize,
) -> Option<CharInterval> {
    let n = needle_tokens.len();
    let last_start = lower_tokens.len() - n;

    let matches_at = |i: usize| lower_tokens[i..i + n] == *needle_tokens;

    let found = (token_cursor..=last_start)
        .find(|&i| matches_at(i))
        .or_else(|| (0..token_cursor.min(last_start + 1)).find(|&i| matches_at(i)))?;

    Some(CharInterval::new(
        tokens[found].interval.start_pos,
        tokens[found + n - 1].interval.end_pos,
    ))
}

fn offset_interval(interval: CharInterval, offset: usize) -> CharInterval {
    CharInterval::new(interval.start_pos + offset, interval.end_pos + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Extraction;

    fn align(text: &str, extractions: &mut [Extraction]) {
        Aligner::default().align_chunk(extractions, text, 0);
    }

    #[test]
    fn test_exact_alignment() {
        let text = "Patient underwent ORIF of the right hip.";
        let mut extractions = vec![Extraction::new("surgery", "ORIF")];
        align(text, &mut extractions);

        let interval = extractions[0].char_interval.unwrap();
        assert_eq!(interval.slice(text), Some("ORIF"));
        assert_eq!(
            extractions[0].alignment_status,
            Some(AlignmentStatus::MatchExact)
        );
    }

    #[test]
    fn test_repeated_snippet_advances_cursor() {
        let text = "Pain 7/10 at rest. Pain 4/10 with activity.";
        let mut extractions = vec![
            Extraction::new("symptom", "Pain"),
            Extraction::new("symptom", "Pain"),
        ];
        align(text, &mut extractions);

        let first = extractions[0].char_interval.unwrap();
        let second = extractions[1].char_interval.unwrap();
        assert_eq!(first.start_pos, 0);
        assert_eq!(second.start_pos, 19);
    }

    #[test]
    fn test_case_insensitive_alignment() {
        let text = "Ambulates 50 feet with rolling walker.";
        let mut extractions = vec![Extraction::new("equipment", "Rolling Walker")];
        align(text, &mut extractions);

        let interval = extractions[0].char_interval.unwrap();
        assert_eq!(interval.slice(text), Some("rolling walker"));
        assert_eq!(
            extractions[0].alignment_status,
            Some(AlignmentStatus::MatchLesser)
        );
    }

    #[test]
    fn test_whitespace_normalized_alignment() {
        let text = "No hip flexion beyond\n90 degrees.";
        let mut extractions = vec![Extraction::new("precaution", "no hip flexion beyond 90 degrees")];
        align(text, &mut extractions);

        assert_eq!(
            extractions[0].alignment_status,
            Some(AlignmentStatus::MatchLesser)
        );
        let interval = extractions[0].char_interval.unwrap();
        assert_eq!(interval.start_pos, 0);
        assert_eq!(interval.slice(text), Some("No hip flexion beyond\n90 degrees"));
    }

    #[test]
    fn test_fuzzy_alignment() {
        let text = "Patient was toe touch weight bearing on the right.";
        let mut extractions = vec![Extraction::new("precaution", "toe-touch weight bearing")];
        align(text, &mut extractions);

        assert_eq!(
            extractions[0].alignment_status,
            Some(AlignmentStatus::MatchFuzzy)
        );
        let interval = extractions[0].char_interval.unwrap();
        assert!(interval.slice(text).unwrap().contains("weight bearing"));
    }

    #[test]
    fn test_unmatchable_extraction_stays_unaligned() {
        let text = "Patient underwent ORIF of the right hip.";
        let mut extractions = vec![Extraction::new("medication", "oxycodone")];
        align(text, &mut extractions);

        assert!(extractions[0].char_interval.is_none());
        assert!(extractions[0].alignment_status.is_none());
    }

    #[test]
    fn test_chunk_offset_is_applied() {
        let chunk = "oxycodone and acetaminophen";
        let mut extractions = vec![Extraction::new("medication", "acetaminophen")];
        Aligner::default().align_chunk(&mut extractions, chunk, 100);

        let interval = extractions[0].char_interval.unwrap();
        assert_eq!(interval.start_pos, 114);
        assert_eq!(interval.end_pos, 127);
    }

    #[test]
    fn test_low_threshold_rejects_weak_matches() {
        let text = "Patient ambulated in the hallway.";
        let aligner = Aligner::new(0.95);
        let mut extractions = vec![Extraction::new("x", "completely unrelated words")];
        aligner.align_chunk(&mut extractions, text, 0);

        assert!(extractions[0].char_interval.is_none());
    }
}
