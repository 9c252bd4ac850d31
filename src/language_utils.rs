use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Language utilities for ISO language code handling
///
/// This module provides functions for normalizing and matching ISO 639-1
/// (2-letter) and ISO 639-2 (3-letter) language codes, and the lookup table
/// deciding which languages get script-aware alignment treatment.
/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"), // French
    ("ger", "deu"), // German
    ("dut", "nld"), // Dutch
    ("gre", "ell"), // Greek
    ("chi", "zho"), // Chinese
    ("cze", "ces"), // Czech
    ("ice", "isl"), // Icelandic
    ("alb", "sqi"), // Albanian
    ("arm", "hye"), // Armenian
    ("baq", "eus"), // Basque
    ("bur", "mya"), // Burmese
    ("per", "fas"), // Persian
    ("geo", "kat"), // Georgian
    ("may", "msa"), // Malay
    ("mac", "mkd"), // Macedonian
    ("rum", "ron"), // Romanian
    ("slo", "slk"), // Slovak
    ("wel", "cym"), // Welsh
];

/// Languages written without mandatory spacing between words. Alignment for
/// these runs on sub-word tokens and removes Unicode (not just ASCII)
/// punctuation, see `alignment`. Stored normalized to ISO 639-2/T.
static EAST_ASIAN_LANGUAGE_CODES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["zho", "jpn", "kor"].into_iter().collect()
});

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's a 3-letter code, accept ISO 639-2/T directly and convert
    // ISO 639-2/B spellings
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        if let Some((_, part2t)) = PART2B_TO_PART2T.iter()
            .find(|(part2b, _)| *part2b == normalized_code)
        {
            return Ok((*part2t).to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(normalized1), Ok(normalized2)) => normalized1 == normalized2,
        _ => false,
    }
}

/// Whether the language is in the East-Asian table (no mandatory spacing
/// between words). Accepts any ISO 639 spelling; `None` and unknown codes
/// are simply not East-Asian.
pub fn is_east_asian(language: Option<&str>) -> bool {
    let Some(code) = language else {
        return false;
    };

    match normalize_to_part2t(code) {
        Ok(normalized) => EAST_ASIAN_LANGUAGE_CODES.contains(normalized.as_str()),
        Err(_) => false,
    }
}
