//! Splitting documents into prompt-sized chunks.
//!
//! Long documents are fed to the model one chunk at a time. Chunk boundaries
//! prefer sentence ends, then newlines, then token boundaries; a single token
//! longer than the buffer is hard-split on a character boundary.

use crate::data::CharInterval;
use crate::tokenizer::{self, Token};

/// A contiguous piece of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Byte interval of the chunk in the source document.
    pub char_interval: CharInterval,
    /// The chunk text.
    pub text: String,
}

/// Iterator over prompt-sized chunks of a document.
pub struct ChunkIterator<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
    max_char_buffer: usize,
}

impl<'a> ChunkIterator<'a> {
    /// Create a chunk iterator over `text` with the given byte budget.
    pub fn new(text: &'a str, max_char_buffer: usize) -> Self {
        Self {
            text,
            tokens: tokenizer::tokenize(text),
            cursor: 0,
            max_char_buffer: max_char_buffer.max(1),
        }
    }

    /// Emit a piece of an oversized token, advancing its start position.
    fn split_oversized_token(&mut self) -> TextChunk {
        let token_interval = self.tokens[self.cursor].interval;
        let start = token_interval.start_pos;

        let mut end = (start + self.max_char_buffer).min(token_interval.end_pos);
        while end > start && !self.text.is_char_boundary(end) {
            end -= 1;
        }
        if end <= start {
            // A single character wider than the buffer still has to go somewhere.
            end = self.text[start..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| start + i)
                .unwrap_or(token_interval.end_pos);
        }

        if end >= token_interval.end_pos {
            self.cursor += 1;
        } else {
            self.tokens[self.cursor].interval.start_pos = end;
        }

        let interval = CharInterval::new(start, end);
        TextChunk {
            char_interval: interval,
            text: self.text[start..end].to_string(),
        }
    }
}

impl Iterator for ChunkIterator<'_> {
    type Item = TextChunk;

    fn next(&mut self) -> Option<TextChunk> {
        if self.cursor >= self.tokens.len() {
            return None;
        }

        let start = self.tokens[self.cursor].interval.start_pos;
        if self.tokens[self.cursor].interval.end_pos - start > self.max_char_buffer {
            return Some(self.split_oversized_token());
        }

        let mut last_fit = self.cursor;
        let mut last_sentence: Option<usize> = None;
        let mut last_newline: Option<usize> = None;

        for j in self.cursor..self.tokens.len() {
            if self.tokens[j].interval.end_pos - start > self.max_char_buffer {
                break;
            }
            last_fit = j;

            if self.tokens[j].ends_sentence(self.text) {
                last_sentence = Some(j);
            }
            if let Some(next) = self.tokens.get(j + 1) {
                let gap = &self.text[self.tokens[j].interval.end_pos..next.interval.start_pos];
                if gap.contains('\n') {
                    last_newline = Some(j);
                }
            }
        }

        let cut = if last_fit + 1 == self.tokens.len() {
            last_fit
        } else {
            last_sentence.or(last_newline).unwrap_or(last_fit)
        };

        let interval = CharInterval::new(start, self.tokens[cut].interval.end_pos);
        self.cursor = cut + 1;

        Some(TextChunk {
            char_interval: interval,
            text: self.text[interval.start_pos..interval.end_pos].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_chunk_when_text_fits() {
        let text = "Patient is stable for discharge.";
        let chunks: Vec<TextChunk> = ChunkIterator::new(text, 1000).collect();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].char_interval, CharInterval::new(0, text.len()));
    }

    #[test]
    fn test_splits_at_sentence_boundary() {
        let text = "He tripped on a rug. Pain was immediate and severe in the right hip.";
        let chunks: Vec<TextChunk> = ChunkIterator::new(text, 40).collect();

        assert!(chunks.len() >= 2);
        assert_eq!(chunks[0].text, "He tripped on a rug.");
        assert!(chunks[1].text.starts_with("Pain was immediate"));
    }

    #[test]
    fn test_splits_at_newline_without_sentence() {
        let text = "Strength: R hip abduction 1/5\nTransfers: Max A with rolling walker";
        let chunks: Vec<TextChunk> = ChunkIterator::new(text, 40).collect();

        assert_eq!(chunks[0].text, "Strength: R hip abduction 1/5");
        assert!(chunks[1].text.starts_with("Transfers"));
    }

    #[test]
    fn test_hard_split_of_oversized_token() {
        let text = "supercalifragilistic";
        let chunks: Vec<TextChunk> = ChunkIterator::new(text, 8).collect();

        assert!(chunks.len() > 1);
        let rejoined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rejoined, text);
        assert!(chunks.iter().all(|c| c.text.len() <= 8));
    }

    #[test]
    fn test_chunks_are_ordered_and_within_budget() {
        let text = "Mr. Doe is a 78 y/o male with a history of hypertension, type 2 \
                    diabetes, and osteoarthritis who presented after a mechanical fall.";
        let chunks: Vec<TextChunk> = ChunkIterator::new(text, 50).collect();

        for pair in chunks.windows(2) {
            assert!(pair[0].char_interval.end_pos <= pair[1].char_interval.start_pos);
        }
        for chunk in &chunks {
            assert!(chunk.text.len() <= 50);
            assert_eq!(
                chunk.char_interval.slice(text),
                Some(chunk.text.as_str())
            );
        }
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert_eq!(ChunkIterator::new("", 100).count(), 0);
        assert_eq!(ChunkIterator::new("   \n  ", 100).count(), 0);
    }
}
