use rngsieve_core::SourceError;
use thiserror::Error;

/// Why a test could not produce a trustworthy p-value.
///
/// None of these are ever turned into a default p-value; the battery reports
/// them against the test that raised them and moves on to the next test.
#[derive(Debug, Error)]
pub enum TestError {
    /// Bad parameters or reference data: non-positive expected counts,
    /// zero-variance slots, zero `psamples`/`tsamples`.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A test body broke the one-p-value-per-invocation contract, produced a
    /// p-value outside [0,1], or tallied a different number of trials than
    /// it declared.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The chi-square survival function was asked to evaluate a non-finite
    /// statistic.
    #[error("numeric domain error: {0}")]
    NumericDomain(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, TestError>;
