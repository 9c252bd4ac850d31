/*!
 * Tests for the bit-parallel edit-distance engine.
 *
 * The randomized cross-check mirrors the original fuzz harness: ambiguity
 * exists only in which minimal script is chosen, never in the distance or
 * the number of edit operations.
 */

use rand::Rng;

use subalign::levenshtein::{distance, editops, opcodes, EditOp, EditOpKind, Opcode, OpcodeKind, Symbol};

/// Encode a str as a symbol sequence for readable test cases
fn symbols(text: &str) -> Vec<Symbol> {
    text.chars().map(|ch| ch as Symbol).collect()
}

/// Textbook O(NM) dynamic program, the independent reference implementation
fn naive_distance(source: &[Symbol], destination: &[Symbol]) -> usize {
    let mut previous: Vec<usize> = (0..=source.len()).collect();

    for (row, &destination_symbol) in destination.iter().enumerate() {
        let mut current = vec![row + 1; source.len() + 1];
        for (col, &source_symbol) in source.iter().enumerate() {
            let substitution_cost = usize::from(source_symbol != destination_symbol);
            current[col + 1] = (previous[col] + substitution_cost)
                .min(previous[col + 1] + 1)
                .min(current[col] + 1);
        }
        previous = current;
    }

    previous[source.len()]
}

/// Asserts the opcode list exactly partitions both sequences, in order
fn assert_partition_law(ops: &[Opcode], source_len: usize, destination_len: usize) {
    let mut source_pos = 0;
    let mut destination_pos = 0;

    for op in ops {
        assert_eq!(op.source.start, source_pos, "source ranges must be contiguous");
        assert_eq!(op.destination.start, destination_pos, "destination ranges must be contiguous");
        source_pos = op.source.end;
        destination_pos = op.destination.end;
    }

    assert_eq!(source_pos, source_len);
    assert_eq!(destination_pos, destination_len);
}

#[test]
fn test_distance_withKittenSitting_shouldBeThree() {
    assert_eq!(distance(&symbols("kitten"), &symbols("sitting")), 3);
}

#[test]
fn test_distance_withEqualSequences_shouldBeZero() {
    assert_eq!(distance(&[], &[]), 0);
    assert_eq!(distance(&symbols("abc"), &symbols("abc")), 0);
}

#[test]
fn test_distance_withEmptySide_shouldBeOtherLength() {
    assert_eq!(distance(&[], &symbols("abc")), 3);
    assert_eq!(distance(&symbols("abcd"), &[]), 4);
}

#[test]
fn test_distance_withSwappedArguments_shouldBeSymmetric() {
    let a = symbols("industry");
    let b = symbols("interest");
    assert_eq!(distance(&a, &b), distance(&b, &a));
}

#[test]
fn test_editops_withKittenSitting_shouldMatchHistoricalScript() {
    let ops = editops(&symbols("kitten"), &symbols("sitting"));
    assert_eq!(ops, vec![
        EditOp { kind: EditOpKind::Replace, source_pos: 0, destination_pos: 0 },
        EditOp { kind: EditOpKind::Replace, source_pos: 4, destination_pos: 4 },
        EditOp { kind: EditOpKind::Insert, source_pos: 6, destination_pos: 6 },
    ]);
}

#[test]
fn test_editops_withEqualSequences_shouldBeEmpty() {
    assert!(editops(&symbols("same"), &symbols("same")).is_empty());
    assert!(editops(&[], &[]).is_empty());
}

#[test]
fn test_editops_withTiedCosts_shouldPreferReplace() {
    // "ab" -> "ba" admits delete+insert at the same cost; the historical
    // tie-break takes the diagonal.
    let ops = editops(&symbols("ab"), &symbols("ba"));
    assert_eq!(ops, vec![
        EditOp { kind: EditOpKind::Replace, source_pos: 0, destination_pos: 0 },
        EditOp { kind: EditOpKind::Replace, source_pos: 1, destination_pos: 1 },
    ]);
}

#[test]
fn test_editops_withFreeMatchBetweenDeletes_shouldSkipMatchedSymbol() {
    // Suffix "bc" is trimmed; the backtrace walks delete, match, delete.
    let ops = editops(&symbols("xaybc"), &symbols("abc"));
    assert_eq!(ops, vec![
        EditOp { kind: EditOpKind::Delete, source_pos: 0, destination_pos: 0 },
        EditOp { kind: EditOpKind::Delete, source_pos: 2, destination_pos: 1 },
    ]);
}

#[test]
fn test_editops_withTrimmedAffixes_shouldReportGlobalPositions() {
    // Common prefix "a" and suffix "c": positions must be shifted back.
    let ops = editops(&symbols("ac"), &symbols("abbc"));
    assert_eq!(ops, vec![
        EditOp { kind: EditOpKind::Insert, source_pos: 1, destination_pos: 1 },
        EditOp { kind: EditOpKind::Insert, source_pos: 1, destination_pos: 2 },
    ]);
}

#[test]
fn test_editops_withWideSequences_shouldBacktraceAcrossBlockBoundary() {
    // 100 symbols with both ends replaced: no affix to trim, so the bit rows
    // span two 64-bit blocks.
    let source: Vec<Symbol> = (0..100).collect();
    let mut destination = source.clone();
    destination[0] = 1000;
    destination[99] = 1001;

    assert_eq!(distance(&source, &destination), 2);
    let ops = editops(&source, &destination);
    assert_eq!(ops, vec![
        EditOp { kind: EditOpKind::Replace, source_pos: 0, destination_pos: 0 },
        EditOp { kind: EditOpKind::Replace, source_pos: 99, destination_pos: 99 },
    ]);
}

#[test]
fn test_opcodes_withKittenSitting_shouldCoalesceRuns() {
    let ops = opcodes(&symbols("kitten"), &symbols("sitting"));
    assert_eq!(ops, vec![
        Opcode { kind: OpcodeKind::Replace, source: 0..1, destination: 0..1 },
        Opcode { kind: OpcodeKind::Equal, source: 1..4, destination: 1..4 },
        Opcode { kind: OpcodeKind::Replace, source: 4..5, destination: 4..5 },
        Opcode { kind: OpcodeKind::Equal, source: 5..6, destination: 5..6 },
        Opcode { kind: OpcodeKind::Insert, source: 6..6, destination: 6..7 },
    ]);
}

#[test]
fn test_opcodes_withEqualSequences_shouldBeSingleEqualRun() {
    let ops = opcodes(&symbols("abc"), &symbols("abc"));
    assert_eq!(ops, vec![
        Opcode { kind: OpcodeKind::Equal, source: 0..3, destination: 0..3 },
    ]);
}

#[test]
fn test_opcodes_withEmptyPair_shouldBeEmpty() {
    assert!(opcodes(&[], &[]).is_empty());
}

#[test]
fn test_opcodes_withArbitraryPairs_shouldSatisfyPartitionLaw() {
    let cases = [
        ("kitten", "sitting"),
        ("", "abc"),
        ("abc", ""),
        ("ab", "ba"),
        ("aaaa", "aa"),
        ("spoken words", "written words"),
    ];

    for (source_text, destination_text) in cases {
        let source = symbols(source_text);
        let destination = symbols(destination_text);
        let ops = opcodes(&source, &destination);
        assert_partition_law(&ops, source.len(), destination.len());
    }
}

#[test]
fn test_engine_withRandomSequences_shouldMatchNaiveDistance() {
    let mut rng = rand::rng();

    for _ in 0..2000 {
        let source_len = rng.random_range(0..40);
        let destination_len = rng.random_range(0..40);
        let source: Vec<Symbol> = (0..source_len).map(|_| rng.random_range(0..6)).collect();
        let destination: Vec<Symbol> =
            (0..destination_len).map(|_| rng.random_range(0..6)).collect();

        let engine_distance = distance(&source, &destination);
        assert_eq!(engine_distance, naive_distance(&source, &destination),
                   "distance mismatch for {source:?} vs {destination:?}");
        assert_eq!(engine_distance, distance(&destination, &source),
                   "distance must be symmetric for {source:?} vs {destination:?}");

        let ops = editops(&source, &destination);
        assert_eq!(ops.len(), engine_distance,
                   "every editop costs exactly one for {source:?} vs {destination:?}");

        assert_partition_law(&opcodes(&source, &destination),
                             source.len(), destination.len());
    }
}

#[test]
fn test_engine_withRandomWideSequences_shouldMatchNaiveDistance() {
    let mut rng = rand::rng();

    for _ in 0..50 {
        let source_len = rng.random_range(65..200);
        let destination_len = rng.random_range(65..200);
        let source: Vec<Symbol> = (0..source_len).map(|_| rng.random_range(0..10)).collect();
        let destination: Vec<Symbol> =
            (0..destination_len).map(|_| rng.random_range(0..10)).collect();

        let engine_distance = distance(&source, &destination);
        assert_eq!(engine_distance, naive_distance(&source, &destination),
                   "multiword distance mismatch");
        assert_eq!(editops(&source, &destination).len(), engine_distance);
        assert_partition_law(&opcodes(&source, &destination),
                             source.len(), destination.len());
    }
}
