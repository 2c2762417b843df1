//! Offset-preserving tokenization.
//!
//! Tokens carry byte intervals into the untouched source text, so anything
//! computed over tokens (chunk boundaries, aligned spans) can be mapped
//! straight back to source offsets.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::CharInterval;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+|\p{N}+|[^\p{L}\p{N}\s]").expect("token pattern is valid"));

/// Kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of letters.
    Word,
    /// A run of digits.
    Number,
    /// A single non-alphanumeric, non-whitespace character.
    Punctuation,
}

/// A token and its position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Byte interval into the source text.
    pub interval: CharInterval,
}

impl Token {
    /// The token's text, sliced from the source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.interval.start_pos..self.interval.end_pos]
    }

    /// Whether this token terminates a sentence.
    pub fn ends_sentence(&self, source: &str) -> bool {
        self.kind == TokenKind::Punctuation && matches!(self.text(source), "." | "?" | "!")
    }
}

/// Tokenize text into words, numbers, and punctuation.
///
/// Tokens are returned in ascending offset order and never overlap.
/// Whitespace is not tokenized; it survives only as gaps between intervals.
pub fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| {
            let first = m.as_str().chars().next();
            let kind = match first {
                Some(c) if c.is_alphabetic() => TokenKind::Word,
                Some(c) if c.is_numeric() => TokenKind::Number,
                _ => TokenKind::Punctuation,
            };
            Token {
                kind,
                interval: CharInterval::new(m.start(), m.end()),
            }
        })
        .collect()
}
