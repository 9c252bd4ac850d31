use once_cell::sync::Lazy;
use regex::Regex;

use crate::tokenizers::SPACE_ESCAPE;

// @module: Script-aware word normalization for alignment

// @const: Unicode punctuation matcher
static UNICODE_PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{P}").unwrap()
});

/// ASCII punctuation stripped for space-delimited scripts. Intentionally not
/// Unicode-aware: the historical behavior, kept so alignments reproduce.
const ASCII_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Strip every Unicode punctuation character
pub(crate) fn remove_unicode_punctuation(word: &str) -> String {
    UNICODE_PUNCTUATION_REGEX.replace_all(word, "").into_owned()
}

/// Maps a word to its comparison key: lower-cases and removes punctuation,
/// as this increases the alignment accuracy. The key is used only to align;
/// output segments always carry the original words.
///
/// East-Asian text arrives sub-word tokenized, so a leading space-escape
/// marker is dropped first (it must not influence the alignment) and
/// punctuation removal is Unicode-aware. All other scripts keep the
/// ASCII-only removal.
///
/// A word that is punctuation throughout keeps its original form: pure
/// punctuation tokens must stay distinguishable from each other instead of
/// all collapsing to one empty key.
pub fn normalize_word(word: &str, east_asian: bool) -> String {
    let mut word = word.to_lowercase();

    let without_punctuation = if east_asian {
        // Space escape needed for detokenization, but it must not influence
        // the alignment.
        if let Some(stripped) = word.strip_prefix(SPACE_ESCAPE) {
            assert!(!stripped.is_empty(), "word should not be only space escape character");
            word = stripped.to_string();
        }
        remove_unicode_punctuation(&word)
    } else {
        word.chars().filter(|ch| !ASCII_PUNCTUATION.contains(*ch)).collect()
    };

    if without_punctuation.is_empty() {
        return word; // keep tokens that are purely punctuation
    }

    without_punctuation
}
