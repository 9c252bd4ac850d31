/*!
 * Reversible sub-word tokenization.
 *
 * Languages without mandatory spacing between words are aligned on sub-word
 * tokens. To keep the pass exactly invertible, the first sub-token of every
 * original word is prefixed with a space-escape marker recording where the
 * word boundaries were; `detokenize_segments` concatenates unmarked tokens
 * back onto their predecessor.
 *
 * The splitter itself is a collaborator behind the `SubwordTokenizer` trait.
 * The built-in `CharTokenizer` (one token per character) is what the library
 * falls back to for the East-Asian languages; callers with a real
 * morphological tokenizer can run the pass themselves.
 */

use anyhow::{Result, anyhow};
use log::debug;

use crate::alignment::normalize::remove_unicode_punctuation;
use crate::data_types::{LineBreak, Segment, Word};
use crate::errors::AlignmentError;

/// Marker prefixed to the first sub-token of each original word, making
/// tokenization reversible. U+2581, as used by sentencepiece-style tools.
pub const SPACE_ESCAPE: char = '▁';

/// Splits one word into sub-tokens. Production script tokenizers live
/// outside this crate; implementations must never return empty tokens.
pub trait SubwordTokenizer {
    /// Split a single word into at least one non-empty sub-token
    fn split(&self, word: &str) -> Vec<String>;
}

/// One token per character; the built-in splitter for scripts where each
/// character is an alignment unit of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTokenizer;

impl SubwordTokenizer for CharTokenizer {
    fn split(&self, word: &str) -> Vec<String> {
        word.chars().map(|ch| ch.to_string()).collect()
    }
}

/// The splitter used for a language when the caller does not bring one.
/// Character-level for every language; only ever consulted for languages in
/// the East-Asian table.
pub fn tokenizer_for_language(_language: &str) -> CharTokenizer {
    CharTokenizer
}

/// Splits every word of every segment into marked sub-token words.
///
/// The first sub-token of each word carries the space-escape marker, every
/// sub-token inherits the word's approximate time, and only the last one
/// keeps the word's line break. With `keep_punctuation_attached`, sub-tokens
/// that are purely punctuation are merged onto a neighboring sub-token of
/// the same word, so that normalization later cannot produce empty tokens.
///
/// Words that already start with the marker are rejected: the marker is
/// reserved and its presence means the input was tokenized twice.
pub fn reversibly_tokenize_segments(segments: &[Segment], tokenizer: &dyn SubwordTokenizer,
                                    keep_punctuation_attached: bool) -> Result<Vec<Segment>> {
    let mut tokenized_segments = Vec::with_capacity(segments.len());

    for segment in segments {
        let mut tokenized_words: Vec<Word> = Vec::with_capacity(segment.len());

        for word in &segment.words {
            if word.string().starts_with(SPACE_ESCAPE) {
                return Err(anyhow!(AlignmentError::MalformedInput(format!(
                    "word '{}' carries the reserved space escape marker", word.string()))));
            }

            let mut sub_tokens = tokenizer.split(word.string());
            if sub_tokens.is_empty() || sub_tokens.iter().any(|token| token.is_empty()) {
                return Err(anyhow!(AlignmentError::MalformedInput(format!(
                    "tokenizer produced an empty split for word '{}'", word.string()))));
            }

            if keep_punctuation_attached {
                sub_tokens = attach_punctuation_tokens(sub_tokens);
            }

            let last = sub_tokens.len() - 1;
            for (position, sub_token) in sub_tokens.into_iter().enumerate() {
                let string = if position == 0 {
                    format!("{SPACE_ESCAPE}{sub_token}")
                } else {
                    sub_token
                };

                let line_break = if position == last { word.line_break() } else { LineBreak::None };
                tokenized_words.push(Word::new(string, line_break, word.approximate_word_time())?);
            }
        }

        tokenized_segments.push(Segment::new(tokenized_words));
    }

    Ok(tokenized_segments)
}

/// Merges punctuation-only sub-tokens onto their neighbor: trailing ones
/// onto the preceding token, word-opening ones onto the following token.
/// A word that is punctuation throughout stays a single token.
fn attach_punctuation_tokens(sub_tokens: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(sub_tokens.len());

    for sub_token in sub_tokens {
        let is_punctuation = remove_unicode_punctuation(&sub_token).is_empty();

        match merged.last_mut() {
            Some(previous) if is_punctuation => previous.push_str(&sub_token),
            _ => merged.push(sub_token),
        }
    }

    // A punctuation run opening the word ended up as its own first token;
    // fold it into the token that follows.
    if merged.len() > 1 && remove_unicode_punctuation(&merged[0]).is_empty() {
        let opening = merged.remove(0);
        merged[0].insert_str(0, &opening);
    }

    merged
}

/// Inverse of `reversibly_tokenize_segments` for a list of segments.
pub fn detokenize_segments(segments: &[Segment]) -> Result<Vec<Segment>> {
    segments.iter().map(detokenize_segment).collect()
}

/// Concatenates sub-token runs back into words: a marker-prefixed token
/// starts a new word (marker stripped), unmarked tokens extend the current
/// one. The rebuilt word takes the run's last line break and the mean of the
/// run's timestamps.
///
/// Re-segmentation can split a word's sub-tokens across a segment boundary,
/// so a segment-initial token without the marker starts a word of its own.
pub fn detokenize_segment(segment: &Segment) -> Result<Segment> {
    let mut words: Vec<Word> = Vec::new();

    let mut run_string = String::new();
    let mut run_times: Vec<Option<f64>> = Vec::new();
    let mut run_break = LineBreak::None;

    let mut finish_run = |string: &mut String, times: &mut Vec<Option<f64>>,
                          line_break: LineBreak, words: &mut Vec<Word>| -> Result<()> {
        if string.is_empty() {
            return Ok(());
        }

        let word_time = mean_word_time(times);
        words.push(Word::new(std::mem::take(string), line_break, word_time)?);
        times.clear();
        Ok(())
    };

    for (position, word) in segment.words.iter().enumerate() {
        let token = word.string();

        if let Some(stripped) = token.strip_prefix(SPACE_ESCAPE) {
            if stripped.is_empty() {
                return Err(anyhow!(AlignmentError::MalformedInput(
                    "token consists only of the space escape marker".to_string())));
            }

            finish_run(&mut run_string, &mut run_times, run_break, &mut words)?;
            run_string.push_str(stripped);
        } else {
            if run_string.is_empty() && position == 0 {
                debug!("segment starts with an unmarked sub-token '{token}', \
                        word was split at a segment boundary");
            }
            run_string.push_str(token);
        }

        run_times.push(word.approximate_word_time());
        run_break = word.line_break();
    }

    finish_run(&mut run_string, &mut run_times, run_break, &mut words)?;

    Ok(Segment::new(words))
}

/// Mean of the run's timestamps; `None` as soon as any sub-token is untimed.
/// A run of identical timestamps (the tokenize output) round-trips exactly.
fn mean_word_time(times: &[Option<f64>]) -> Option<f64> {
    let first = *times.first()?;
    if times.iter().any(|time| time.is_none()) {
        return None;
    }

    if times.iter().all(|time| *time == first) {
        return first;
    }

    let sum: f64 = times.iter().map(|time| time.unwrap_or(0.0)).sum();
    Some(sum / times.len() as f64)
}
