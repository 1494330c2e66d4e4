//! Run configuration shared by every test in a battery run.

use serde::Serialize;

use crate::error::{Result, TestError};
use crate::kstest::Aggregator;
use crate::registry::TestDescriptor;

/// Invocations per aggregated test unless a test or the user says otherwise.
pub const DEFAULT_PSAMPLES: usize = 100;

/// Length of the bit strings used by the bit distribution tests.
pub const DEFAULT_BITS: usize = 128;

/// User-facing knobs. `None` means "use the test's own default".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub tsamples: Option<usize>,
    pub psamples: Option<usize>,
    pub bits: usize,
    pub aggregator: Aggregator,
    pub reseed: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tsamples: None,
            psamples: None,
            bits: DEFAULT_BITS,
            aggregator: Aggregator::default(),
            reseed: false,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tsamples == Some(0) {
            return Err(TestError::Configuration(
                "tsamples must be at least 1".to_string(),
            ));
        }
        if self.psamples == Some(0) {
            return Err(TestError::Configuration(
                "psamples must be at least 1".to_string(),
            ));
        }
        if self.bits < 2 {
            return Err(TestError::Configuration(format!(
                "bit strings need at least 2 bits, got {}",
                self.bits
            )));
        }
        Ok(())
    }

    /// Trial parameters for one test, with overrides applied.
    pub fn params_for(&self, test: &TestDescriptor) -> TrialParams {
        TrialParams {
            tsamples: self.tsamples.unwrap_or(test.tsamples),
            bits: self.bits,
        }
    }

    pub fn psamples_for(&self, test: &TestDescriptor) -> usize {
        self.psamples.unwrap_or(test.psamples)
    }
}

/// What a single invocation of a test body needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrialParams {
    /// Trials per invocation.
    pub tsamples: usize,
    /// Bit-string length for bit distribution tests.
    pub bits: usize,
}
