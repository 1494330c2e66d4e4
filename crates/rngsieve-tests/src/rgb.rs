//! Bit-position tests on fixed-length bit strings.
//!
//! Every trial starts a fresh string on a draw boundary, so slot `j` always
//! sees the same bit position of the generator's output words.

use rngsieve_core::{BitStream, RngSource};

use crate::chisq::NTest;
use crate::error::{Result, TestError};

fn check_bits(bits: usize) -> Result<()> {
    if bits < 2 {
        return Err(TestError::Configuration(format!(
            "bit strings need at least 2 bits, got {bits}"
        )));
    }
    Ok(())
}

/// Frequency of ones at each of `bits` positions.
pub fn bit_distribution(rng: &mut dyn RngSource, tsamples: usize, bits: usize) -> Result<f64> {
    check_bits(bits)?;
    let mut ntest = NTest::uniform(bits, tsamples as u64, 0.5);
    let mut stream = BitStream::new(rng);
    for _ in 0..tsamples {
        stream.discard_buffer();
        for slot in 0..bits {
            if stream.next_bit() {
                ntest.tally(slot);
            }
        }
    }
    ntest.evaluate()
}

/// Frequency of one two-bit `pattern` (0b00..=0b11) at each of `bits`
/// disjoint pair positions.
///
/// A trial reads `2 * bits` bits; slot `j` matches when bits `2j` and
/// `2j + 1` read, in order, as `pattern`.
pub fn bit_pairs(
    rng: &mut dyn RngSource,
    tsamples: usize,
    bits: usize,
    pattern: u8,
) -> Result<f64> {
    check_bits(bits)?;
    if pattern > 0b11 {
        return Err(TestError::Configuration(format!(
            "bit pair pattern must be 0..=3, got {pattern}"
        )));
    }
    let mut ntest = NTest::uniform(bits, tsamples as u64, 0.25);
    let mut stream = BitStream::new(rng);
    for _ in 0..tsamples {
        stream.discard_buffer();
        for slot in 0..bits {
            if stream.next_bits(2) as u8 == pattern {
                ntest.tally(slot);
            }
        }
    }
    ntest.evaluate()
}
