//! Property tests for GF(2) rank.

use proptest::prelude::*;
use rngsieve_tests::BitMatrix;

fn rank_of(cols: usize, rows: &[u64]) -> usize {
    BitMatrix::from_rows(cols, rows).rank()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rank_never_exceeds_shape(
        cols in 1usize..=64,
        rows in prop::collection::vec(any::<u64>(), 1..48),
    ) {
        let r = rank_of(cols, &rows);
        prop_assert!(r <= rows.len().min(cols));
    }

    #[test]
    fn rank_ignores_row_order(
        cols in 1usize..=64,
        rows in prop::collection::vec(any::<u64>(), 1..48),
        shift in 0usize..48,
    ) {
        let r = rank_of(cols, &rows);

        let mut reversed = rows.clone();
        reversed.reverse();
        prop_assert_eq!(rank_of(cols, &reversed), r);

        let mut rotated = rows.clone();
        let by = shift % rows.len();
        rotated.rotate_left(by);
        prop_assert_eq!(rank_of(cols, &rotated), r);
    }

    #[test]
    fn dependent_row_adds_no_rank(
        cols in 1usize..=64,
        rows in prop::collection::vec(any::<u64>(), 2..32),
        a in 0usize..32,
        b in 0usize..32,
    ) {
        let r = rank_of(cols, &rows);
        let mut extended = rows.clone();
        extended.push(rows[a % rows.len()] ^ rows[b % rows.len()]);
        prop_assert_eq!(rank_of(cols, &extended), r);
    }

    #[test]
    fn zero_rows_add_no_rank(
        cols in 1usize..=64,
        rows in prop::collection::vec(any::<u64>(), 1..32),
        zeros in 1usize..8,
    ) {
        let r = rank_of(cols, &rows);
        let mut padded = rows.clone();
        padded.extend(std::iter::repeat_n(0u64, zeros));
        prop_assert_eq!(rank_of(cols, &padded), r);
    }
}

#[test]
fn identity_has_full_rank() {
    for n in 1..=64usize {
        let rows: Vec<u64> = (0..n).map(|i| 1u64 << i).collect();
        assert_eq!(rank_of(n, &rows), n);
    }
}

#[test]
fn all_zero_matrix_has_rank_zero() {
    assert_eq!(rank_of(32, &[0; 32]), 0);
}
