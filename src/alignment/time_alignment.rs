use anyhow::{Result, anyhow};
use log::debug;

use crate::data_types::{Segment, Subtitle};
use crate::errors::AlignmentError;
use crate::language_utils::is_east_asian;
use crate::tokenizers::{detokenize_segment, reversibly_tokenize_segments, tokenizer_for_language};

/// Re-segments the hypothesis according to the reference subtitle timings.
///
/// Each output subtitle keeps the time stamps and index of its reference
/// counterpart and contains the hypothesis words whose approximate times
/// fall into that window, i.e. `start_time <= time < end_time`. Hypothesis
/// words that fall into no window are dropped — including words timed before
/// the first window and after the last one.
///
/// Reference subtitles must be sorted by start time; words must carry
/// approximate times (interpolated by the timed file reader), otherwise the
/// input is rejected.
pub fn time_align_hypothesis_to_reference(hypothesis: &[Segment], reference: &[Subtitle],
                                          language: Option<&str>) -> Result<Vec<Subtitle>> {
    let east_asian = is_east_asian(language);

    let tokenized;
    let hypothesis = if east_asian {
        let tokenizer = tokenizer_for_language(language.unwrap_or_default());
        tokenized = reversibly_tokenize_segments(hypothesis, &tokenizer, false)?;
        tokenized.as_slice()
    } else {
        hypothesis
    };

    let reference_start_times: Vec<f64> =
        reference.iter().map(|subtitle| subtitle.start_time).collect();

    let mut aligned_word_lists: Vec<Segment> = vec![Segment::default(); reference.len()];
    let mut dropped_words = 0usize;

    for segment in hypothesis {
        for word in &segment.words {
            let word_time = word.approximate_word_time().ok_or_else(|| {
                anyhow!(AlignmentError::MalformedInput(format!(
                    "word '{}' has no approximate time; was the hypothesis read from a plain \
                     text file?", word.string())))
            })?;

            // Index of the last subtitle starting at or before the word.
            let insertion_point =
                reference_start_times.partition_point(|start| *start <= word_time);
            if insertion_point == 0 {
                // Word is before the first subtitle, drop it.
                dropped_words += 1;
                continue;
            }
            let subtitle_index = insertion_point - 1;

            if word_time < reference[subtitle_index].end_time {
                aligned_word_lists[subtitle_index].words.push(word.clone());
            } else {
                // In the gap after its window (or past the last one).
                dropped_words += 1;
            }
        }
    }

    if dropped_words > 0 {
        debug!("dropped {dropped_words} hypothesis words outside every reference window");
    }

    let mut aligned_hypothesis = Vec::with_capacity(reference.len());

    for (segment, reference_subtitle) in aligned_word_lists.into_iter().zip(reference) {
        let segment = if east_asian { detokenize_segment(&segment)? } else { segment };

        aligned_hypothesis.push(Subtitle::new(
            segment,
            reference_subtitle.index,
            reference_subtitle.start_time,
            reference_subtitle.end_time,
        )?);
    }

    Ok(aligned_hypothesis)
}
