use std::fmt;
use anyhow::{Result, anyhow};

use crate::errors::AlignmentError;

// @module: Core data model shared by the alignment pipeline

/// Marker emitted after a word that ends a subtitle line
pub const END_OF_LINE_SYMBOL: &str = "<eol>";

/// Marker emitted after a word that ends a subtitle block
pub const END_OF_BLOCK_SYMBOL: &str = "<eob>";

/// Line-break annotation carried by a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
    /// No break after this word
    #[default]
    None,
    /// The word ends a line within its subtitle block
    EndOfLine,
    /// The word ends its subtitle block
    EndOfBlock,
}

// @struct: Atomic token of a segment
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    // @field: Token text, never empty
    string: String,

    // @field: Break annotation following the token
    line_break: LineBreak,

    // @field: Interpolated timestamp in seconds, only set for timed input
    approximate_word_time: Option<f64>,
}

impl Word {
    /// Creates a word, rejecting empty token text.
    pub fn new(string: impl Into<String>, line_break: LineBreak,
               approximate_word_time: Option<f64>) -> Result<Self> {
        let string = string.into();
        if string.is_empty() {
            return Err(anyhow!(AlignmentError::MalformedInput(
                "empty word string".to_string())));
        }

        Ok(Word { string, line_break, approximate_word_time })
    }

    /// Convenience constructor for untimed text without a break - used widely by tests
    pub fn plain(string: impl Into<String>) -> Result<Self> {
        Self::new(string, LineBreak::None, None)
    }

    /// Token text
    pub fn string(&self) -> &str {
        &self.string
    }

    /// Break annotation following the token
    pub fn line_break(&self) -> LineBreak {
        self.line_break
    }

    /// Interpolated timestamp, if the word came from a timed subtitle
    pub fn approximate_word_time(&self) -> Option<f64> {
        self.approximate_word_time
    }
}

/// Ordered sequence of words; insertion order is reading order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    /// Words in reading order
    pub words: Vec<Word>,
}

impl Segment {
    /// Create a segment from a word list
    pub fn new(words: Vec<Word>) -> Self {
        Segment { words }
    }

    /// Number of words in the segment
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the segment holds no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Render the segment as a space-joined string, optionally emitting
    /// `<eol>` / `<eob>` markers after words carrying those breaks.
    /// `include_last_break = false` suppresses a trailing `<eob>`.
    pub fn to_display_string(&self, include_line_breaks: bool, include_last_break: bool) -> String {
        if !include_line_breaks {
            return self.words.iter()
                .map(|word| word.string())
                .collect::<Vec<_>>()
                .join(" ");
        }

        let mut tokens: Vec<&str> = Vec::with_capacity(self.words.len() * 2);
        for word in &self.words {
            tokens.push(word.string());

            match word.line_break() {
                LineBreak::EndOfLine => tokens.push(END_OF_LINE_SYMBOL),
                LineBreak::EndOfBlock => tokens.push(END_OF_BLOCK_SYMBOL),
                LineBreak::None => {}
            }
        }

        if !include_last_break && tokens.last() == Some(&END_OF_BLOCK_SYMBOL) {
            tokens.pop();
        }

        tokens.join(" ")
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_display_string(false, true))
    }
}

/// A segment with a temporal validity window and a position in the file
#[derive(Debug, Clone, PartialEq)]
pub struct Subtitle {
    /// Words of the caption
    pub segment: Segment,

    /// Position of the caption within its file
    pub index: i32,

    /// Window start in seconds
    pub start_time: f64,

    /// Window end in seconds
    pub end_time: f64,
}

impl Subtitle {
    // @creates: Validated subtitle
    // @validates: Time window ordering
    pub fn new(segment: Segment, index: i32, start_time: f64, end_time: f64) -> Result<Self> {
        if end_time < start_time {
            return Err(anyhow!(
                "invalid time window for subtitle {}: end {} < start {}",
                index, end_time, start_time
            ));
        }

        Ok(Subtitle { segment, index, start_time, end_time })
    }

    /// Words of the caption, in reading order
    pub fn words(&self) -> &[Word] {
        &self.segment.words
    }
}

impl fmt::Display for Subtitle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.start_time, self.end_time)?;
        writeln!(f, "{}", self.segment)
    }
}

/// Linearly interpolates word times between a subtitle's start and end time,
/// as described in https://www.isca-archive.org/interspeech_2021/cherry21_interspeech.pdf
///
/// Returns a copy of the words with `approximate_word_time` set. Both bounds
/// are narrowed inward by a small epsilon so the first and last word always
/// fall strictly inside their own subtitle window.
pub fn interpolate_word_times(words: &[Word], subtitle_start_time: f64,
                              subtitle_end_time: f64) -> Result<Vec<Word>> {
    const EPSILON: f64 = 1e-8;
    let start = subtitle_start_time + EPSILON;
    let stop = subtitle_end_time - EPSILON;

    if stop - start < 0.0 {
        return Err(anyhow!(
            "negative subtitle duration: [{}, {}]", subtitle_start_time, subtitle_end_time));
    }

    let num_words = words.len();
    let mut timed_words = Vec::with_capacity(num_words);

    for (position, word) in words.iter().enumerate() {
        // Evenly spaced samples over [start, stop] inclusive; a single word
        // lands on the start bound.
        let word_time = if num_words > 1 {
            start + (stop - start) * position as f64 / (num_words - 1) as f64
        } else {
            start
        };

        timed_words.push(Word::new(word.string(), word.line_break(), Some(word_time))?);
    }

    Ok(timed_words)
}
