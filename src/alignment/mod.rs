/*!
 * Hypothesis-to-reference re-segmentation.
 *
 * Two independent modes:
 * - `levenshtein_alignment`: minimal-edit-script alignment of the word
 *   streams, driven by the engine's opcodes (with `alphabet` mapping words
 *   to symbols and `normalize` producing the comparison keys).
 * - `time_alignment`: assignment by interpolated word timestamps, for input
 *   that carries timing.
 */

pub mod alphabet;
pub mod normalize;
pub mod levenshtein_alignment;
pub mod time_alignment;

pub use levenshtein_alignment::levenshtein_align_hypothesis_to_reference;
pub use time_alignment::time_align_hypothesis_to_reference;
