use std::collections::HashMap;

use anyhow::{Result, anyhow};

use crate::errors::AlignmentError;
use crate::levenshtein::Symbol;

// @module: Word-to-symbol mapping for the character-oriented engine

/// Codes start above a reserved low range, kept from the historical mapping
/// of words onto printable characters.
const SYMBOL_OFFSET: u32 = 32;

/// Largest number of distinct words one alphabet can hold
const MAX_DISTINCT_WORDS: usize = (u32::MAX - SYMBOL_OFFSET) as usize;

/// The engine operates on scalar symbols, not lists of strings, so distinct
/// normalized words are pooled across both sequences and numbered in order
/// of first appearance (reference first). The alphabet is rebuilt per call
/// and never persisted; reproducibility for the same input is all that is
/// required.
///
/// Returns the reference and hypothesis symbol sequences, or a capacity
/// error if the pooled vocabulary cannot be represented.
pub fn map_words_to_symbols(reference_words: &[String],
                            hypothesis_words: &[String]) -> Result<(Vec<Symbol>, Vec<Symbol>)> {
    let mut vocabulary: HashMap<&str, Symbol> = HashMap::new();

    for word in reference_words.iter().chain(hypothesis_words.iter()) {
        let next_code = SYMBOL_OFFSET + vocabulary.len() as u32;
        vocabulary.entry(word.as_str()).or_insert(next_code);

        if vocabulary.len() > MAX_DISTINCT_WORDS {
            return Err(anyhow!(AlignmentError::Capacity {
                distinct: vocabulary.len(),
                max: MAX_DISTINCT_WORDS,
            }));
        }
    }

    let reference_symbols = reference_words.iter().map(|word| vocabulary[word.as_str()]).collect();
    let hypothesis_symbols = hypothesis_words.iter().map(|word| vocabulary[word.as_str()]).collect();

    Ok((reference_symbols, hypothesis_symbols))
}
