/*!
 * # subalign - Hypothesis-to-reference subtitle alignment
 *
 * A Rust library for re-segmenting an ASR/translation hypothesis word stream
 * to match a reference subtitle segmentation.
 *
 * ## Features
 *
 * - Bit-parallel Levenshtein edit distance over symbol sequences
 * - Exact minimal edit scripts with reproducible historical tie-breaking
 *   (matches python-Levenshtein v0.12.0 choices among equal-cost scripts)
 * - Coalesced opcode runs partitioning both sequences
 * - Lexical re-alignment: redistribute hypothesis words into reference
 *   segment boundaries along the minimal edit script
 * - Temporal re-alignment: assign words to reference subtitle windows by
 *   interpolated word timestamps
 * - Reversible sub-word tokenization for languages without inter-word
 *   spacing, ISO 639 language code handling
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `data_types`: Words, segments, subtitles and word-time interpolation
 * - `levenshtein`: The edit-distance engine (distance, editops, opcodes)
 * - `alignment`: Re-segmentation on top of the engine:
 *   - `alignment::normalize`: Script-aware comparison keys
 *   - `alignment::alphabet`: Word-to-symbol mapping
 *   - `alignment::levenshtein_alignment`: Lexical re-aligner
 *   - `alignment::time_alignment`: Temporal re-aligner
 * - `tokenizers`: Reversible sub-word tokenization
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the library
 *
 * File parsing, metric computation and production tokenizers are
 * collaborators outside this crate; they produce and consume the
 * `data_types` model.
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod data_types;
pub mod levenshtein;
pub mod alignment;
pub mod tokenizers;
pub mod language_utils;
pub mod errors;

// Re-export main types for easier usage
pub use data_types::{LineBreak, Segment, Subtitle, Word, interpolate_word_times};
pub use levenshtein::{EditOp, EditOpKind, Opcode, OpcodeKind};
pub use levenshtein::{distance as edit_distance, opcodes as edit_opcodes};
pub use alignment::{levenshtein_align_hypothesis_to_reference, time_align_hypothesis_to_reference};
pub use errors::AlignmentError;
