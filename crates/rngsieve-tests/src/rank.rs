//! Binary matrices and their rank over GF(2).

/// A `rows` x `cols` matrix of bits, each row packed into 64-bit words.
///
/// Column 0 is the most significant bit of the first word of a row, so a row
/// loaded from an integer reads left to right the way it prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    words_per_row: usize,
    data: Vec<u64>,
}

impl BitMatrix {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let words_per_row = cols.div_ceil(64);
        Self {
            rows,
            cols,
            words_per_row,
            data: vec![0; rows * words_per_row],
        }
    }

    /// Build a matrix of at most 64 columns from one integer per row.
    pub fn from_rows(cols: usize, rows: &[u64]) -> Self {
        let mut m = Self::zeros(rows.len(), cols);
        for (r, &value) in rows.iter().enumerate() {
            m.set_row_bits(r, value);
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn locate(&self, row: usize, col: usize) -> (usize, u64) {
        (
            row * self.words_per_row + col / 64,
            1u64 << (63 - col % 64),
        )
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        let (idx, mask) = self.locate(row, col);
        self.data[idx] & mask != 0
    }

    pub fn set(&mut self, row: usize, col: usize, bit: bool) {
        let (idx, mask) = self.locate(row, col);
        if bit {
            self.data[idx] |= mask;
        } else {
            self.data[idx] &= !mask;
        }
    }

    /// Load the low `cols` bits of `value` into `row`, most significant bit
    /// first. Only meaningful for matrices of at most 64 columns.
    pub fn set_row_bits(&mut self, row: usize, value: u64) {
        debug_assert!(self.cols <= 64, "set_row_bits needs cols <= 64");
        if self.cols == 0 {
            return;
        }
        let masked = if self.cols >= 64 {
            value
        } else {
            value & ((1u64 << self.cols) - 1)
        };
        self.data[row * self.words_per_row] = masked << (64 - self.cols.min(64));
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for w in 0..self.words_per_row {
            self.data
                .swap(a * self.words_per_row + w, b * self.words_per_row + w);
        }
    }

    /// `row ^= source`, word by word.
    fn xor_row_into(&mut self, source: usize, row: usize) {
        for w in 0..self.words_per_row {
            let v = self.data[source * self.words_per_row + w];
            self.data[row * self.words_per_row + w] ^= v;
        }
    }

    /// Rank over GF(2) by Gaussian elimination. Consumes the matrix.
    pub fn rank(mut self) -> usize {
        let mut rank = 0;
        for col in 0..self.cols {
            if rank == self.rows {
                break;
            }
            let pivot = (rank..self.rows).find(|&row| self.get(row, col));
            let pivot = match pivot {
                Some(p) => p,
                None => continue,
            };
            self.swap_rows(rank, pivot);
            for row in rank + 1..self.rows {
                if self.get(row, col) {
                    self.xor_row_into(rank, row);
                }
            }
            rank += 1;
        }
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: usize) -> BitMatrix {
        let mut m = BitMatrix::zeros(n, n);
        for i in 0..n {
            m.set(i, i, true);
        }
        m
    }

    #[test]
    fn test_zero_matrix_has_rank_zero() {
        assert_eq!(BitMatrix::zeros(32, 32).rank(), 0);
        assert_eq!(BitMatrix::zeros(6, 8).rank(), 0);
    }

    #[test]
    fn test_identity_is_full_rank() {
        for n in [1, 6, 31, 32, 64, 65, 100] {
            assert_eq!(identity(n).rank(), n, "n={n}");
        }
    }

    #[test]
    fn test_rank_bounded_by_smaller_dimension() {
        // Six independent rows in eight columns.
        let m = BitMatrix::from_rows(8, &[0x80, 0x40, 0x20, 0x10, 0x08, 0x04]);
        assert_eq!(m.rank(), 6);
        // Eight rows can never exceed rank six in six columns.
        let rows: Vec<u64> = (0..8).map(|i| 1u64 << (i % 6)).collect();
        assert_eq!(BitMatrix::from_rows(6, &rows).rank(), 6);
    }

    #[test]
    fn test_dependent_rows() {
        // Third row is the XOR of the first two.
        let m = BitMatrix::from_rows(4, &[0b1100, 0b0110, 0b1010]);
        assert_eq!(m.rank(), 2);
        // Duplicate rows.
        let m = BitMatrix::from_rows(32, &[0xDEAD_BEEF, 0xDEAD_BEEF]);
        assert_eq!(m.rank(), 1);
    }

    #[test]
    fn test_pivot_needs_row_swap() {
        // Leading bit of row 0 is clear; pivot must come from below.
        let m = BitMatrix::from_rows(3, &[0b011, 0b100, 0b001]);
        assert_eq!(m.rank(), 3);
    }

    #[test]
    fn test_zero_row_contributes_nothing() {
        let m = BitMatrix::from_rows(8, &[0xFF, 0x00, 0x0F]);
        assert_eq!(m.rank(), 2);
    }

    #[test]
    fn test_row_layout_is_msb_first() {
        let m = BitMatrix::from_rows(8, &[0b1000_0001]);
        assert!(m.get(0, 0));
        assert!(!m.get(0, 1));
        assert!(m.get(0, 7));
    }

    #[test]
    fn test_set_row_bits_masks_extra_bits() {
        let m = BitMatrix::from_rows(4, &[0xF1]);
        assert!(!m.get(0, 0));
        assert!(m.get(0, 3));
    }

    #[test]
    fn test_wide_matrix_spans_words() {
        let mut m = BitMatrix::zeros(2, 130);
        m.set(0, 129, true);
        m.set(1, 129, true);
        m.set(1, 70, true);
        assert!(m.get(1, 70));
        assert_eq!(m.rank(), 2);
    }
}
