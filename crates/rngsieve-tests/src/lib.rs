//! Diehard-inspired randomness test battery.
//!
//! A test body turns `tsamples` draws into one p-value through a chi-square
//! evaluator ([`VTest`] or [`NTest`]). The [`Sampler`] runs that body
//! `psamples` times against one shared generator and folds the p-values into
//! a single verdict with a Kolmogorov-Smirnov or Kuiper test. Results come
//! back as [`TestResult`]s with a p-value, a letter grade (A through F) and
//! the full p-value series.

pub mod battery;
pub mod chisq;
pub mod config;
pub mod diehard;
pub mod error;
pub mod kstest;
pub mod rank;
pub mod registry;
pub mod rgb;
pub mod sample;

use serde::Serialize;

pub use battery::{calculate_quality_score, evaluate_test, run_all_tests, run_battery, run_test};
pub use chisq::{ChiSquareOutcome, NTest, VTest, chisq_sf};
pub use config::{DEFAULT_BITS, DEFAULT_PSAMPLES, RunConfig, TrialParams};
pub use error::{Result, TestError};
pub use kstest::{Aggregate, Aggregator, kstest, kuiper};
pub use rank::BitMatrix;
pub use registry::{TestDescriptor, TestKind, all_tests, find_test};
pub use sample::{PValueSeries, PValueSink, SampleOutcome, Sampler};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Below this the generator is reported as failing at 0.01%.
pub const FAIL_THRESHOLD: f64 = 0.0001;

/// Below this the result is suspicious but not conclusive.
pub const WEAK_THRESHOLD: f64 = 0.01;

/// Three-way reading of an aggregated p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Passed,
    Weak,
    Failed,
}

impl Verdict {
    pub fn from_p(p: Option<f64>) -> Self {
        match p {
            Some(p) if p < FAIL_THRESHOLD => Self::Failed,
            Some(p) if p < WEAK_THRESHOLD => Self::Weak,
            Some(_) => Self::Passed,
            None => Self::Failed,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "PASSED"),
            Self::Weak => write!(f, "WEAK"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Result of one aggregated test against one generator.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub generator: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    /// D or V of the aggregation step.
    pub statistic: f64,
    pub details: String,
    pub grade: char,
    pub verdict: Verdict,
    /// Per-invocation p-values in draw order.
    pub pvalues: Vec<f64>,
    pub tsamples: usize,
    pub psamples: usize,
    /// Set when the test was aborted instead of evaluated.
    pub error: Option<String>,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold.
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    /// A test that could not produce a p-value.
    pub fn aborted(
        test: &TestDescriptor,
        generator: &str,
        params: TrialParams,
        psamples: usize,
        error: &TestError,
    ) -> Self {
        Self {
            name: test.name.to_string(),
            generator: generator.to_string(),
            passed: false,
            p_value: None,
            statistic: 0.0,
            details: format!("Aborted: {error}"),
            grade: 'F',
            verdict: Verdict::Failed,
            pvalues: Vec::new(),
            tsamples: params.tsamples,
            psamples,
            error: Some(error.to_string()),
        }
    }

    /// Whether the generator fails this test at the 0.01% level.
    pub fn fails_hard(&self) -> bool {
        self.verdict == Verdict::Failed
    }
}
