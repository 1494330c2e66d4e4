//! Abstract generator trait and metadata.
//!
//! Every generator under test implements the [`RngSource`] trait, which
//! provides metadata via [`GeneratorInfo`], uniform 32-bit draws and explicit
//! reseeding. Test code receives the generator as `&mut dyn RngSource`, so all
//! draws of a run share one strictly ordered sequence.

/// Expected statistical quality of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorQuality {
    /// Cryptographic or otherwise well-studied generator; should pass.
    Good,
    /// Fast non-cryptographic generator; should pass these tests.
    Fast,
    /// Historically flawed generator kept for demonstrating failures.
    Weak,
    /// Not random at all; every test should fail.
    Broken,
}

impl std::fmt::Display for GeneratorQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Fast => write!(f, "fast"),
            Self::Weak => write!(f, "weak"),
            Self::Broken => write!(f, "broken"),
        }
    }
}

/// Metadata about a generator.
#[derive(Debug, Clone)]
pub struct GeneratorInfo {
    /// Unique identifier (e.g. `"stdrng"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Expected quality class.
    pub quality: GeneratorQuality,
}

/// Trait that every generator under test must implement.
///
/// Implementations must be deterministic: the same seed always yields the
/// same sequence of draws.
pub trait RngSource {
    /// Generator metadata.
    fn info(&self) -> &GeneratorInfo;

    /// Next uniformly distributed 32-bit draw.
    fn next_u32(&mut self) -> u32;

    /// Restart the sequence from `seed`.
    fn reseed(&mut self, seed: u64);

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}
