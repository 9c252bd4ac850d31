use anyhow::{Result, anyhow};
use log::debug;

use crate::alignment::alphabet::map_words_to_symbols;
use crate::alignment::normalize::normalize_word;
use crate::data_types::{Segment, Word};
use crate::errors::AlignmentError;
use crate::language_utils::is_east_asian;
use crate::levenshtein::{self, OpcodeKind};
use crate::tokenizers::{detokenize_segments, reversibly_tokenize_segments, tokenizer_for_language};

/// Runs the Levenshtein algorithm to get the minimal set of edit operations
/// to convert the full list of hypothesis words into the full list of
/// reference words. The edit operations implicitly define an alignment
/// between hypothesis and reference words. Using this alignment, the
/// hypotheses are re-segmented to match the reference segmentation.
///
/// The output has exactly one segment per reference segment (possibly
/// empty). Hypothesis words are only ever re-assigned, never dropped:
/// `delete` operations consume reference positions exclusively.
pub fn levenshtein_align_hypothesis_to_reference(hypothesis: &[Segment], reference: &[Segment],
                                                 language: Option<&str>) -> Result<Vec<Segment>> {
    if reference.is_empty() {
        return Err(anyhow!(AlignmentError::MalformedInput(
            "cannot re-segment against an empty reference".to_string())));
    }

    let east_asian = is_east_asian(language);

    let tokenized;
    let (hypothesis, reference) = if east_asian {
        // Punctuation kept attached because we remove it below to normalize
        // the tokens before alignment, and that must not change the number
        // of tokens or create empty tokens.
        let tokenizer = tokenizer_for_language(language.unwrap_or_default());
        tokenized = (
            reversibly_tokenize_segments(hypothesis, &tokenizer, true)?,
            reversibly_tokenize_segments(reference, &tokenizer, true)?,
        );
        (tokenized.0.as_slice(), tokenized.1.as_slice())
    } else {
        (hypothesis, reference)
    };

    let reference_word_strings: Vec<String> = reference.iter()
        .flat_map(|segment| &segment.words)
        .map(|word| normalize_word(word.string(), east_asian))
        .collect();
    let hypothesis_word_strings: Vec<String> = hypothesis.iter()
        .flat_map(|segment| &segment.words)
        .map(|word| normalize_word(word.string(), east_asian))
        .collect();

    let all_hypothesis_words: Vec<&Word> = hypothesis.iter()
        .flat_map(|segment| &segment.words)
        .collect();

    debug!("lexically aligning {} hypothesis words to {} reference words in {} segments",
           all_hypothesis_words.len(), reference_word_strings.len(), reference.len());

    let (reference_symbols, hypothesis_symbols) =
        map_words_to_symbols(&reference_word_strings, &hypothesis_word_strings)?;

    let opcodes = levenshtein::opcodes(&reference_symbols, &hypothesis_symbols);

    // Cumulative word index at which each reference segment ends; empty
    // segments produce duplicate entries.
    let reference_segment_boundaries: Vec<usize> = reference.iter()
        .scan(0, |total, segment| {
            *total += segment.len();
            Some(*total)
        })
        .collect();

    let mut current_segment_index = 0;
    let mut aligned_word_lists: Vec<Vec<Word>> = vec![Vec::new(); reference.len()];

    for opcode in &opcodes {
        match opcode.kind {
            OpcodeKind::Equal | OpcodeKind::Replace => {
                assert_eq!(opcode.destination.len(), opcode.source.len());
            }
            OpcodeKind::Insert => assert!(opcode.source.is_empty()),
            OpcodeKind::Delete => assert!(opcode.destination.is_empty()),
        }

        // Equal and replace pair positions 1:1; insert carries only a
        // hypothesis position, delete only a reference position. Zipping the
        // ranges with padding unifies the three shapes.
        let pair_count = opcode.source.len().max(opcode.destination.len());

        for offset in 0..pair_count {
            let reference_position = opcode.source.clone().nth(offset);
            let hypothesis_position = opcode.destination.clone().nth(offset);

            // Advance the active output segment whenever the reference
            // position crosses a boundary.
            if let Some(reference_position) = reference_position {
                if reference_position >= reference_segment_boundaries[current_segment_index] {
                    assert_eq!(reference_position,
                               reference_segment_boundaries[current_segment_index],
                               "bug: missing reference position in edit operations");
                    current_segment_index += 1;

                    // Empty reference segments end at the same word index as
                    // their predecessor and show up as duplicate boundaries.
                    // Skip them; they must receive no hypothesis words.
                    while current_segment_index < reference_segment_boundaries.len()
                        && reference_segment_boundaries[current_segment_index]
                            == reference_segment_boundaries[current_segment_index - 1]
                    {
                        current_segment_index += 1;
                    }
                }
            }

            if let Some(hypothesis_position) = hypothesis_position {
                let word = all_hypothesis_words[hypothesis_position];
                aligned_word_lists[current_segment_index].push(word.clone());
            }
        }
    }

    let aligned_hypothesis: Vec<Segment> =
        aligned_word_lists.into_iter().map(Segment::new).collect();

    if east_asian {
        return detokenize_segments(&aligned_hypothesis);
    }

    Ok(aligned_hypothesis)
}
