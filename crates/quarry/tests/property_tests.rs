//! Property-based tests for tokenization and chunking.

use proptest::prelude::*;

use quarry::chunking::ChunkIterator;
use quarry::tokenizer::tokenize;

proptest! {
    #[test]
    fn tokens_are_ordered_disjoint_and_in_bounds(text in ".{0,400}") {
        let tokens = tokenize(&text);

        for token in &tokens {
            prop_assert!(token.interval.start_pos < token.interval.end_pos);
            prop_assert!(token.interval.end_pos <= text.len());
            prop_assert!(token.interval.slice(&text).is_some());
        }
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].interval.end_pos <= pair[1].interval.start_pos);
        }
    }

    #[test]
    fn tokens_never_contain_whitespace(text in "\\PC{0,200}") {
        for token in tokenize(&text) {
            let slice = token.interval.slice(&text).unwrap();
            prop_assert!(!slice.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn chunks_lose_nothing_but_whitespace(text in "[a-zA-Z0-9 .,\n]{0,400}", max in 4usize..64) {
        let chunks: Vec<_> = ChunkIterator::new(&text, max).collect();

        // Only inter-chunk whitespace is dropped; every token byte survives.
        let rejoined: String = chunks
            .iter()
            .flat_map(|c| c.text.chars())
            .filter(|c| !c.is_whitespace())
            .collect();
        let original: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        prop_assert_eq!(rejoined, original);
    }

    #[test]
    fn chunks_respect_budget_and_order(text in "[a-zA-Z0-9 .,\n]{0,400}", max in 4usize..64) {
        let chunks: Vec<_> = ChunkIterator::new(&text, max).collect();

        for chunk in &chunks {
            prop_assert!(chunk.text.len() <= max);
            prop_assert_eq!(
                chunk.char_interval.slice(&text),
                Some(chunk.text.as_str())
            );
        }
        for pair in chunks.windows(2) {
            prop_assert!(pair[0].char_interval.end_pos <= pair[1].char_interval.start_pos);
        }
    }
}
