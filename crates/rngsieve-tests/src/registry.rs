//! The numbered list of available tests.

use rngsieve_core::RngSource;

use crate::config::TrialParams;
use crate::diehard::{RANK_6X8, RANK_31X31, RANK_32X32, RankTest, count_1s_stream};
use crate::error::{Result, TestError};
use crate::rgb::{bit_distribution, bit_pairs};

/// What a test computes in one invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestKind {
    Rank(RankTest),
    Count1sStream,
    BitDistribution,
    BitPair { pattern: u8 },
}

impl TestKind {
    /// Run one invocation and return its p-value.
    pub fn invoke(&self, rng: &mut dyn RngSource, params: &TrialParams) -> Result<f64> {
        match *self {
            Self::Rank(test) => test.run(rng, params.tsamples),
            Self::Count1sStream => count_1s_stream(rng, params.tsamples),
            Self::BitDistribution => bit_distribution(rng, params.tsamples, params.bits),
            Self::BitPair { pattern } => bit_pairs(rng, params.tsamples, params.bits, pattern),
        }
    }
}

/// A registered test and its default sample counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub tsamples: usize,
    pub psamples: usize,
    pub kind: TestKind,
}

static TESTS: [TestDescriptor; 9] = [
    TestDescriptor {
        name: "diehard_rank_32x32",
        description: "Binary rank of 32x32 matrices built from 32 words",
        tsamples: 40_000,
        psamples: 100,
        kind: TestKind::Rank(RANK_32X32),
    },
    TestDescriptor {
        name: "diehard_rank_31x31",
        description: "Binary rank of 31x31 matrices, leftmost 31 bits of 31 words",
        tsamples: 40_000,
        psamples: 100,
        kind: TestKind::Rank(RANK_31X31),
    },
    TestDescriptor {
        name: "diehard_rank_6x8",
        description: "Binary rank of 6x8 matrices built from six bytes",
        tsamples: 100_000,
        psamples: 100,
        kind: TestKind::Rank(RANK_6X8),
    },
    TestDescriptor {
        name: "diehard_count_1s_stream",
        description: "Overlapping 5-letter words of byte popcounts",
        tsamples: 256_000,
        psamples: 100,
        kind: TestKind::Count1sStream,
    },
    TestDescriptor {
        name: "rgb_bitdist",
        description: "Frequency of ones at each bit position",
        tsamples: 10_000,
        psamples: 100,
        kind: TestKind::BitDistribution,
    },
    TestDescriptor {
        name: "rgb_bitpair_00",
        description: "Frequency of the pair 00 at each pair position",
        tsamples: 10_000,
        psamples: 100,
        kind: TestKind::BitPair { pattern: 0b00 },
    },
    TestDescriptor {
        name: "rgb_bitpair_01",
        description: "Frequency of the pair 01 at each pair position",
        tsamples: 10_000,
        psamples: 100,
        kind: TestKind::BitPair { pattern: 0b01 },
    },
    TestDescriptor {
        name: "rgb_bitpair_10",
        description: "Frequency of the pair 10 at each pair position",
        tsamples: 10_000,
        psamples: 100,
        kind: TestKind::BitPair { pattern: 0b10 },
    },
    TestDescriptor {
        name: "rgb_bitpair_11",
        description: "Frequency of the pair 11 at each pair position",
        tsamples: 10_000,
        psamples: 100,
        kind: TestKind::BitPair { pattern: 0b11 },
    },
];

/// Every registered test, in list order.
pub fn all_tests() -> &'static [TestDescriptor] {
    &TESTS
}

/// Look a test up by name (case-insensitive) or list index.
pub fn find_test(key: &str) -> Result<&'static TestDescriptor> {
    let key = key.trim();
    let found = match key.parse::<usize>() {
        Ok(index) => TESTS.get(index),
        Err(_) => TESTS.iter().find(|t| t.name.eq_ignore_ascii_case(key)),
    };
    found.ok_or_else(|| TestError::Configuration(format!("unknown test '{key}'")))
}
