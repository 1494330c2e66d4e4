//! Seedable generators and the name → constructor registry.

use rand::rngs::{SmallRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::error::SourceError;
use crate::source::{GeneratorInfo, GeneratorQuality, RngSource};

// ---------------------------------------------------------------------------
// rand-backed generators
// ---------------------------------------------------------------------------

static STDRNG_INFO: GeneratorInfo = GeneratorInfo {
    name: "stdrng",
    description: "rand's StdRng (ChaCha12 block cipher)",
    quality: GeneratorQuality::Good,
};

/// `rand::rngs::StdRng` behind the [`RngSource`] interface.
pub struct StdRngSource {
    rng: StdRng,
}

impl StdRngSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RngSource for StdRngSource {
    fn info(&self) -> &GeneratorInfo {
        &STDRNG_INFO
    }

    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

static SMALLRNG_INFO: GeneratorInfo = GeneratorInfo {
    name: "smallrng",
    description: "rand's SmallRng (xoshiro family)",
    quality: GeneratorQuality::Fast,
};

/// `rand::rngs::SmallRng` behind the [`RngSource`] interface.
pub struct SmallRngSource {
    rng: SmallRng,
}

impl SmallRngSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RngSource for SmallRngSource {
    fn info(&self) -> &GeneratorInfo {
        &SMALLRNG_INFO
    }

    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }
}

// ---------------------------------------------------------------------------
// Classic arithmetic generators
// ---------------------------------------------------------------------------

static LCG64_INFO: GeneratorInfo = GeneratorInfo {
    name: "lcg64",
    description: "64-bit LCG (Knuth MMIX constants), high 32 bits",
    quality: GeneratorQuality::Fast,
};

/// 64-bit linear congruential generator returning the high word.
pub struct Lcg64 {
    state: u64,
}

impl Lcg64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RngSource for Lcg64 {
    fn info(&self) -> &GeneratorInfo {
        &LCG64_INFO
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    fn reseed(&mut self, seed: u64) {
        self.state = seed;
    }
}

static RANDU_INFO: GeneratorInfo = GeneratorInfo {
    name: "randu",
    description: "IBM RANDU, x <- 65539 x mod 2^31 (31 bits, left-aligned)",
    quality: GeneratorQuality::Weak,
};

/// IBM RANDU. The 31-bit state is shifted left so the output stays
/// MSB-aligned; the lowest bit of every draw is always 0.
pub struct Randu {
    state: u32,
}

impl Randu {
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 1 };
        rng.reseed(seed);
        rng
    }
}

impl RngSource for Randu {
    fn info(&self) -> &GeneratorInfo {
        &RANDU_INFO
    }

    fn next_u32(&mut self) -> u32 {
        self.state = ((u64::from(self.state) * 65539) & 0x7FFF_FFFF) as u32;
        self.state << 1
    }

    fn reseed(&mut self, seed: u64) {
        // The state must be odd.
        self.state = ((seed as u32) & 0x7FFF_FFFF) | 1;
    }
}

static COUNTER_INFO: GeneratorInfo = GeneratorInfo {
    name: "counter",
    description: "incrementing 32-bit counter",
    quality: GeneratorQuality::Broken,
};

/// Returns seed, seed + 1, seed + 2, ...
pub struct Counter {
    next: u32,
}

impl Counter {
    pub fn new(seed: u64) -> Self {
        Self { next: seed as u32 }
    }
}

impl RngSource for Counter {
    fn info(&self) -> &GeneratorInfo {
        &COUNTER_INFO
    }

    fn next_u32(&mut self) -> u32 {
        let value = self.next;
        self.next = self.next.wrapping_add(1);
        value
    }

    fn reseed(&mut self, seed: u64) {
        self.next = seed as u32;
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

type Constructor = fn(u64) -> Box<dyn RngSource>;

fn build_stdrng(seed: u64) -> Box<dyn RngSource> {
    Box::new(StdRngSource::new(seed))
}

fn build_smallrng(seed: u64) -> Box<dyn RngSource> {
    Box::new(SmallRngSource::new(seed))
}

fn build_lcg64(seed: u64) -> Box<dyn RngSource> {
    Box::new(Lcg64::new(seed))
}

fn build_randu(seed: u64) -> Box<dyn RngSource> {
    Box::new(Randu::new(seed))
}

fn build_counter(seed: u64) -> Box<dyn RngSource> {
    Box::new(Counter::new(seed))
}

static REGISTRY: [(&GeneratorInfo, Constructor); 5] = [
    (&STDRNG_INFO, build_stdrng),
    (&SMALLRNG_INFO, build_smallrng),
    (&LCG64_INFO, build_lcg64),
    (&RANDU_INFO, build_randu),
    (&COUNTER_INFO, build_counter),
];

/// Metadata for every registered generator, in list order.
pub fn available_generators() -> Vec<&'static GeneratorInfo> {
    REGISTRY.iter().map(|(info, _)| *info).collect()
}

/// Build a generator by name (case-insensitive) or by list index.
pub fn create_generator(key: &str, seed: u64) -> Result<Box<dyn RngSource>, SourceError> {
    let key = key.trim();
    let entry = match key.parse::<usize>() {
        Ok(index) => REGISTRY.get(index),
        Err(_) => REGISTRY
            .iter()
            .find(|(info, _)| info.name.eq_ignore_ascii_case(key)),
    };
    let (info, build) = entry.ok_or_else(|| SourceError::UnknownGenerator(key.to_string()))?;
    log::debug!("creating generator {} with seed {seed}", info.name);
    Ok(build(seed))
}

/// Draw a fresh seed from the operating system.
pub fn random_seed() -> Result<u64, SourceError> {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf).map_err(|e| SourceError::Entropy(e.to_string()))?;
    Ok(u64::from_le_bytes(buf))
}

/// A missing or zero seed means "pick one from OS entropy".
pub fn resolve_seed(seed: Option<u64>) -> Result<u64, SourceError> {
    match seed {
        Some(s) if s != 0 => Ok(s),
        _ => random_seed(),
    }
}
