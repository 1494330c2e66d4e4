//! Test bodies from Marsaglia's Diehard battery.
//!
//! Each body performs one invocation: `tsamples` trials against the shared
//! generator, a histogram, one chi-square evaluation, one p-value.

use rngsieve_core::{BitStream, RngSource};

use crate::chisq::{VTest, chisq_sf};
use crate::error::{Result, TestError};
use crate::rank::BitMatrix;

// ═══════════════════════════════════════════════════════════════════════════════
// BINARY RANK
// ═══════════════════════════════════════════════════════════════════════════════

/// Reference distribution of matrix ranks, rare low ranks pooled.
///
/// `probabilities[0]` is P(rank <= `pooled_rank`), then one entry per rank up
/// to full rank. These are tabulated values, not derived at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankTable {
    pub pooled_rank: usize,
    pub probabilities: &'static [f64],
}

/// Ranks 29 (and below), 30, 31, 32 of a random 32x32 matrix. The same four
/// values hold, shifted down by one, for 31x31.
const LARGE_SQUARE_PROBABILITIES: &[f64] =
    &[0.0052854502, 0.1283502644, 0.5775761902, 0.2887880952];

pub const RANK_32X32_TABLE: RankTable = RankTable {
    pooled_rank: 29,
    probabilities: LARGE_SQUARE_PROBABILITIES,
};

pub const RANK_31X31_TABLE: RankTable = RankTable {
    pooled_rank: 28,
    probabilities: LARGE_SQUARE_PROBABILITIES,
};

/// Ranks 4 (and below), 5, 6 of a random 6x8 matrix. Ranks 0..=3 together
/// have probability below 1e-4, far too rare to stand as their own buckets
/// at any practical trial count.
pub const RANK_6X8_TABLE: RankTable = RankTable {
    pooled_rank: 4,
    probabilities: &[0.149858e-06 + 0.808926e-04 + 0.936197e-02, 0.217439, 0.773118],
};

/// Binary rank test for one matrix shape.
///
/// Every row is read as `row_bits` consecutive bits from the stream and its
/// leftmost `cols` bits are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankTest {
    pub rows: usize,
    pub cols: usize,
    pub row_bits: u32,
    pub table: RankTable,
}

/// 32 full 32-bit words.
pub const RANK_32X32: RankTest = RankTest {
    rows: 32,
    cols: 32,
    row_bits: 32,
    table: RANK_32X32_TABLE,
};

/// Leftmost 31 bits of 31 words.
pub const RANK_31X31: RankTest = RankTest {
    rows: 31,
    cols: 31,
    row_bits: 32,
    table: RANK_31X31_TABLE,
};

/// Six consecutive bytes.
pub const RANK_6X8: RankTest = RankTest {
    rows: 6,
    cols: 8,
    row_bits: 8,
    table: RANK_6X8_TABLE,
};

impl RankTest {
    fn validate(&self) -> Result<()> {
        if self.cols == 0 || self.cols > self.row_bits as usize || self.row_bits > 32 {
            return Err(TestError::Configuration(format!(
                "rank test needs 0 < cols <= row_bits <= 32, got cols={} row_bits={}",
                self.cols, self.row_bits
            )));
        }
        let full_rank = self.rows.min(self.cols);
        let top = (self.table.pooled_rank + self.table.probabilities.len()).checked_sub(1);
        if top != Some(full_rank) {
            return Err(TestError::Configuration(format!(
                "rank table covers ranks up to {top:?} but a {}x{} matrix has full rank {full_rank}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// Bucket of a rank: everything at or below the pooled rank shares 0.
    pub fn bucket(&self, rank: usize) -> usize {
        rank.saturating_sub(self.table.pooled_rank)
    }

    /// Fill a fresh matrix from the stream.
    pub fn next_matrix(&self, bits: &mut BitStream<'_>) -> BitMatrix {
        let mut matrix = BitMatrix::zeros(self.rows, self.cols);
        let drop = self.row_bits - self.cols as u32;
        for row in 0..self.rows {
            let word = bits.next_bits(self.row_bits) >> drop;
            matrix.set_row_bits(row, u64::from(word));
        }
        matrix
    }

    /// One invocation: rank `tsamples` matrices, chi-square the rank counts.
    pub fn run(&self, rng: &mut dyn RngSource, tsamples: usize) -> Result<f64> {
        self.validate()?;
        let mut vtest = VTest::new(tsamples as u64, self.table.probabilities);
        let mut bits = BitStream::new(rng);
        for _ in 0..tsamples {
            let rank = self.next_matrix(&mut bits).rank();
            vtest.tally(self.bucket(rank));
        }
        vtest.evaluate()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COUNT THE 1s (STREAM)
// ═══════════════════════════════════════════════════════════════════════════════

/// Letter probabilities for popcounts {0,1,2}, 3, 4, 5, {6,7,8} of a byte.
pub const LETTER_WEIGHTS: [f64; 5] = [
    37.0 / 256.0,
    56.0 / 256.0,
    70.0 / 256.0,
    56.0 / 256.0,
    37.0 / 256.0,
];

/// Map a byte to one of five letters by its number of set bits.
pub fn letter_of(byte: u8) -> usize {
    match byte.count_ones() {
        0..=2 => 0,
        3 => 1,
        4 => 2,
        5 => 3,
        _ => 4,
    }
}

/// Probability of every `letters`-letter word, indexed in base 5 with the
/// most recent letter least significant.
pub(crate) fn word_probabilities(letters: u32) -> Vec<f64> {
    let words = 5usize.pow(letters);
    (0..words)
        .map(|mut word| {
            let mut p = 1.0;
            for _ in 0..letters {
                p *= LETTER_WEIGHTS[word % 5];
                word /= 5;
            }
            p
        })
        .collect()
}

/// Degrees of freedom of Q5 - Q4: 5^5 - 5^4.
const COUNT_1S_DF: f64 = 2500.0;

/// One invocation of count-the-1s on a byte stream.
///
/// Overlapping 5-letter and 4-letter words are tallied into two bucket
/// vectors. Q5 - Q4 of their Pearson statistics is chi-square with 2500
/// degrees of freedom.
pub fn count_1s_stream(rng: &mut dyn RngSource, tsamples: usize) -> Result<f64> {
    const WORDS5: usize = 3125;
    const WORDS4: usize = 625;

    let trials = tsamples as u64;
    let mut five = VTest::new(trials, &word_probabilities(5));
    let mut four = VTest::new(trials, &word_probabilities(4));

    let mut bits = BitStream::new(rng);
    let mut word = 0usize;
    for _ in 0..4 {
        word = (word * 5 + letter_of(bits.next_byte())) % WORDS5;
    }
    for _ in 0..tsamples {
        word = (word * 5 + letter_of(bits.next_byte())) % WORDS5;
        five.tally(word);
        four.tally(word % WORDS4);
    }

    let q5 = five.statistic()?;
    let q4 = four.statistic()?;
    let chi2 = q5 - q4;
    log::debug!("count_1s_stream: Q5={q5:.2}, Q4={q4:.2}, Q5-Q4={chi2:.2}");
    chisq_sf(chi2, COUNT_1S_DF)
}
