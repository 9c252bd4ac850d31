/*!
 * Error types for the subalign library.
 *
 * This module contains custom error types for the alignment pipeline,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Invariant violations (e.g. an unexplained state during the edit-distance
 * backtrace) are deliberately *not* represented here: they indicate bugs in
 * the engine rather than bad input and surface as panics.
 */

use thiserror::Error;

/// Errors that can occur while preparing or running an alignment
#[derive(Error, Debug)]
pub enum AlignmentError {
    /// The symbol alphabet cannot hold every distinct word
    #[error("symbol alphabet overflow: {distinct} distinct words exceed capacity {max}")]
    Capacity {
        /// Number of distinct normalized words requested
        distinct: usize,
        /// Largest representable alphabet size
        max: usize,
    },

    /// Input violates the data-model contract (rejected before any processing)
    #[error("malformed input: {0}")]
    MalformedInput(String),
}
