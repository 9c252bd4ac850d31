/*!
 * Bit-parallel Levenshtein engine with reproducible tie-breaking.
 *
 * Distance uses the Myers bit-vector recurrence. Edit scripts are recovered
 * by back-tracing over the retained per-row delta vectors, making the exact
 * same choice among equal-cost minimal scripts as python-Levenshtein v0.12.0,
 * which downstream re-segmentation historically depended on. A different
 * tie-break would still be a minimal script, but would not reproduce
 * reference alignments.
 *
 * Recomputing matrix cells from the delta vectors partly defeats the purpose
 * of the bit-parallel formulation; backwards compatibility matters more here
 * than speed.
 */

use std::collections::HashMap;
use std::ops::Range;

/// Scalar symbol fed to the engine. Word alignment maps each distinct word
/// to one of these, see `alignment::alphabet`.
pub type Symbol = u32;

/// A single edit operation transforming the source into the destination.
/// "equal" is never materialized; matches are implied by positional gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOpKind {
    /// Insert the destination symbol at `destination_pos`
    Insert,
    /// Delete the source symbol at `source_pos`
    Delete,
    /// Substitute the source symbol at `source_pos`
    Replace,
}

/// Edit operation with its positions in the untrimmed sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOp {
    /// Operation kind
    pub kind: EditOpKind,
    /// Index into the source sequence
    pub source_pos: usize,
    /// Index into the destination sequence
    pub destination_pos: usize,
}

/// Kind of a coalesced opcode run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeKind {
    /// Symbols match; both ranges have equal length
    Equal,
    /// Destination-only run; source range is empty
    Insert,
    /// Source-only run; destination range is empty
    Delete,
    /// Paired substitution run; both ranges have equal length
    Replace,
}

/// Maximal run of one edit-operation kind (or an implied equal run),
/// expressed as paired half-open ranges. A full opcode list partitions
/// `[0, source_len)` and `[0, destination_len)` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    /// Run kind
    pub kind: OpcodeKind,
    /// Covered source indices
    pub source: Range<usize>,
    /// Covered destination indices
    pub destination: Range<usize>,
}

/// Levenshtein distance (unit-cost insert/delete/substitute) between two
/// symbol sequences.
pub fn distance(source: &[Symbol], destination: &[Symbol]) -> usize {
    let (prefix_len, suffix_len) = common_affix(source, destination);
    let source = &source[prefix_len..source.len() - suffix_len];
    let destination = &destination[prefix_len..destination.len() - suffix_len];

    delta_matrix(source, destination).distance
}

/// Minimal edit script between two symbol sequences, canonical under the
/// historical tie-break (prefer continuing an insert/delete run, then
/// matches, then replace, then starting a new insert, then a new delete).
///
/// Panics if the backtrace reaches an unexplained state; that is an engine
/// bug, not an input condition.
pub fn editops(source: &[Symbol], destination: &[Symbol]) -> Vec<EditOp> {
    let (prefix_len, suffix_len) = common_affix(source, destination);
    let source = &source[prefix_len..source.len() - suffix_len];
    let destination = &destination[prefix_len..destination.len() - suffix_len];

    let matrix = delta_matrix(source, destination);
    if matrix.distance == 0 {
        return Vec::new();
    }

    // Collected bottom-right to top-left, reversed at the end.
    let mut reversed_ops: Vec<EditOp> = Vec::with_capacity(matrix.distance);
    let mut remaining = matrix.distance;
    let mut col = source.len();
    let mut row = destination.len();
    let mut direction = Direction::None;

    while row != 0 && col != 0 {
        let current_distance = matrix.cell(row, col);
        let deletion_distance = matrix.cell(row, col - 1);

        let (replace_distance, insertion_distance) = if row > 1 {
            (matrix.cell(row - 1, col - 1), matrix.cell(row - 1, col))
        } else {
            // Row 0 of the implicit matrix is not stored; its cells are the
            // column indices.
            (col - 1, col)
        };

        if direction == Direction::Insert && current_distance == insertion_distance + 1 {
            remaining -= 1;
            row -= 1;
            reversed_ops.push(EditOp {
                kind: EditOpKind::Insert,
                source_pos: col + prefix_len,
                destination_pos: row + prefix_len,
            });
        } else if direction == Direction::Delete && current_distance == deletion_distance + 1 {
            remaining -= 1;
            col -= 1;
            reversed_ops.push(EditOp {
                kind: EditOpKind::Delete,
                source_pos: col + prefix_len,
                destination_pos: row + prefix_len,
            });
        } else if current_distance == replace_distance && source[col - 1] == destination[row - 1] {
            // Free match, no editop.
            col -= 1;
            row -= 1;
            direction = Direction::None;
        } else if current_distance == replace_distance + 1 {
            col -= 1;
            row -= 1;
            remaining -= 1;
            direction = Direction::None;
            reversed_ops.push(EditOp {
                kind: EditOpKind::Replace,
                source_pos: col + prefix_len,
                destination_pos: row + prefix_len,
            });
        } else if direction == Direction::None && current_distance == insertion_distance + 1 {
            remaining -= 1;
            row -= 1;
            direction = Direction::Insert;
            reversed_ops.push(EditOp {
                kind: EditOpKind::Insert,
                source_pos: col + prefix_len,
                destination_pos: row + prefix_len,
            });
        } else if direction == Direction::None && current_distance == deletion_distance + 1 {
            remaining -= 1;
            col -= 1;
            direction = Direction::Delete;
            reversed_ops.push(EditOp {
                kind: EditOpKind::Delete,
                source_pos: col + prefix_len,
                destination_pos: row + prefix_len,
            });
        } else {
            panic!("bug while back-tracing cost matrix at row {row}, col {col}");
        }
    }

    while col != 0 {
        remaining -= 1;
        col -= 1;
        reversed_ops.push(EditOp {
            kind: EditOpKind::Delete,
            source_pos: col + prefix_len,
            destination_pos: row + prefix_len,
        });
    }

    while row != 0 {
        remaining -= 1;
        row -= 1;
        reversed_ops.push(EditOp {
            kind: EditOpKind::Insert,
            source_pos: col + prefix_len,
            destination_pos: row + prefix_len,
        });
    }

    assert_eq!(remaining, 0,
               "bug: distance differs from number of edit ops computed during back-tracing");

    reversed_ops.reverse();
    reversed_ops
}

/// Coalesced opcode runs covering both sequences completely, derived from
/// `editops` by filling positional gaps with `Equal` runs.
pub fn opcodes(source: &[Symbol], destination: &[Symbol]) -> Vec<Opcode> {
    let ops = editops(source, destination);

    let mut blocks: Vec<Opcode> = Vec::new();
    let mut source_pos = 0;
    let mut destination_pos = 0;
    let mut i = 0;

    while i < ops.len() {
        if source_pos < ops[i].source_pos || destination_pos < ops[i].destination_pos {
            blocks.push(Opcode {
                kind: OpcodeKind::Equal,
                source: source_pos..ops[i].source_pos,
                destination: destination_pos..ops[i].destination_pos,
            });
            source_pos = ops[i].source_pos;
            destination_pos = ops[i].destination_pos;
        }

        let source_begin = source_pos;
        let destination_begin = destination_pos;
        let kind = ops[i].kind;

        while i < ops.len()
            && ops[i].kind == kind
            && source_pos == ops[i].source_pos
            && destination_pos == ops[i].destination_pos
        {
            match kind {
                EditOpKind::Replace => {
                    source_pos += 1;
                    destination_pos += 1;
                }
                EditOpKind::Insert => destination_pos += 1,
                EditOpKind::Delete => source_pos += 1,
            }

            i += 1;
        }

        blocks.push(Opcode {
            kind: match kind {
                EditOpKind::Replace => OpcodeKind::Replace,
                EditOpKind::Insert => OpcodeKind::Insert,
                EditOpKind::Delete => OpcodeKind::Delete,
            },
            source: source_begin..source_pos,
            destination: destination_begin..destination_pos,
        });
    }

    if source_pos < source.len() || destination_pos < destination.len() {
        blocks.push(Opcode {
            kind: OpcodeKind::Equal,
            source: source_pos..source.len(),
            destination: destination_pos..destination.len(),
        });
    }

    blocks
}

/// Backtrace carry-over: which run kind the previous step continued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    None,
    Insert,
    Delete,
}

const WORD_BITS: usize = 64;

/// Distance plus the per-row delta vectors of the implicit cost matrix.
///
/// `VP`/`VN` mark the columns where row `r` is one more / one less than row
/// `r - 1` along the source axis. Rows are kept so the backtrace can
/// reconstruct any cell value; this is the only reason the engine is not
/// O(1) in memory. Vectors are stored as little-endian `u64` blocks because
/// sequences routinely exceed native register width.
struct DeltaMatrix {
    distance: usize,
    /// Bits valid in each row vector (== trimmed source length)
    width: usize,
    vp_rows: Vec<Vec<u64>>,
    vn_rows: Vec<Vec<u64>>,
}

impl DeltaMatrix {
    /// Value of the implicit cost matrix at `(row, col)`, `row >= 1`:
    /// popcount of the masked low `col` bits of the row's delta vectors,
    /// offset by the row index.
    fn cell(&self, row: usize, col: usize) -> usize {
        debug_assert!(row >= 1 && col <= self.width);

        let positive = count_ones_below(&self.vp_rows[row - 1], col) as isize;
        let negative = count_ones_below(&self.vn_rows[row - 1], col) as isize;
        let value = positive - negative + row as isize;

        debug_assert!(value >= 0, "bug: negative cost matrix cell");
        value as usize
    }
}

/// Runs the Myers bit-parallel recurrence over `destination`, one row per
/// destination symbol, retaining every row's delta vectors.
fn delta_matrix(source: &[Symbol], destination: &[Symbol]) -> DeltaMatrix {
    let width = source.len();

    if width == 0 {
        return DeltaMatrix {
            distance: destination.len(),
            width,
            vp_rows: Vec::new(),
            vn_rows: Vec::new(),
        };
    }

    let blocks = width.div_ceil(WORD_BITS);

    // Per-symbol pattern masks: bit i set iff source[i] equals the symbol.
    let mut pattern_masks: HashMap<Symbol, Vec<u64>> = HashMap::new();
    for (i, &symbol) in source.iter().enumerate() {
        let mask = pattern_masks.entry(symbol).or_insert_with(|| vec![0u64; blocks]);
        mask[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
    }

    let last_bits = width - (blocks - 1) * WORD_BITS;
    let last_valid_mask: u64 = if last_bits == WORD_BITS {
        u64::MAX
    } else {
        (1u64 << last_bits) - 1
    };
    let top_bit_mask: u64 = 1u64 << (last_bits - 1);

    let mut vp: Vec<u64> = vec![u64::MAX; blocks];
    vp[blocks - 1] = last_valid_mask;
    let mut vn: Vec<u64> = vec![0u64; blocks];
    let mut current_distance = width;

    let mut vp_rows: Vec<Vec<u64>> = Vec::with_capacity(destination.len());
    let mut vn_rows: Vec<Vec<u64>> = Vec::with_capacity(destination.len());

    let empty_mask = vec![0u64; blocks];

    for &symbol in destination {
        let pattern = pattern_masks.get(&symbol).unwrap_or(&empty_mask);

        // Carries propagate low block to high block: one for the
        // (PM & VP) + VP addition, one bit each for the HP/HN shifts
        // (the HP shift starts at 1, Myers' X_{-1}).
        let mut add_carry: u64 = 0;
        let mut hp_carry: u64 = 1;
        let mut hn_carry: u64 = 0;

        let mut new_vp = vec![0u64; blocks];
        let mut new_vn = vec![0u64; blocks];

        for block in 0..blocks {
            let pm_j = pattern[block];
            let old_vp = vp[block];
            let old_vn = vn[block];

            // D0 = (((PM & VP) + VP) ^ VP) | PM | VN, block-wise with carry
            let pm_and_vp = pm_j & old_vp;
            let (partial, carry_low) = pm_and_vp.overflowing_add(add_carry);
            let (sum, carry_high) = partial.overflowing_add(old_vp);
            add_carry = (carry_low as u64) | (carry_high as u64);
            let d0 = (sum ^ old_vp) | pm_j | old_vn;

            let hp = old_vn | !(d0 | old_vp);
            let hn = d0 & old_vp;

            // The running distance is read off the top source bit before the
            // shift, exactly as in the single-word formulation.
            if block == blocks - 1 {
                if hp & last_valid_mask & top_bit_mask != 0 {
                    current_distance += 1;
                }
                if hn & last_valid_mask & top_bit_mask != 0 {
                    current_distance -= 1;
                }
            }

            let hp_shifted = (hp << 1) | hp_carry;
            let hn_shifted = (hn << 1) | hn_carry;
            new_vp[block] = hn_shifted | !(d0 | hp_shifted);
            new_vn[block] = hp_shifted & d0;
            hp_carry = hp >> (WORD_BITS - 1);
            hn_carry = hn >> (WORD_BITS - 1);
        }

        // NOT fills the last block's unused high bits with garbage.
        new_vp[blocks - 1] &= last_valid_mask;
        new_vn[blocks - 1] &= last_valid_mask;

        vp = new_vp;
        vn = new_vn;

        vp_rows.push(vp.clone());
        vn_rows.push(vn.clone());
    }

    DeltaMatrix {
        distance: current_distance,
        width,
        vp_rows,
        vn_rows,
    }
}

/// Popcount of bits `[0, bits)` of a little-endian block vector
fn count_ones_below(vector: &[u64], bits: usize) -> u32 {
    let full_blocks = bits / WORD_BITS;
    let mut count: u32 = vector[..full_blocks].iter().map(|block| block.count_ones()).sum();

    let remainder = bits % WORD_BITS;
    if remainder != 0 {
        count += (vector[full_blocks] & ((1u64 << remainder) - 1)).count_ones();
    }

    count
}

/// Length of the common prefix
fn common_prefix(source: &[Symbol], destination: &[Symbol]) -> usize {
    source.iter().zip(destination.iter()).take_while(|(a, b)| a == b).count()
}

/// Length of the common suffix
fn common_suffix(source: &[Symbol], destination: &[Symbol]) -> usize {
    source.iter().rev().zip(destination.iter().rev()).take_while(|(a, b)| a == b).count()
}

/// Shared prefix and suffix lengths; the suffix is measured after removing
/// the prefix so the two never overlap.
fn common_affix(source: &[Symbol], destination: &[Symbol]) -> (usize, usize) {
    let prefix_len = common_prefix(source, destination);
    let suffix_len = common_suffix(&source[prefix_len..], &destination[prefix_len..]);
    (prefix_len, suffix_len)
}
