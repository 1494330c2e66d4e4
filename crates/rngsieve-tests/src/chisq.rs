//! Chi-square evaluators: observed-vs-expected histograms → one p-value.
//!
//! [`VTest`] handles mutually exclusive multinomial buckets (every trial lands
//! in exactly one bucket). [`NTest`] handles independent binomial slots, each
//! with its own trial count and success probability and no fixed-sum
//! constraint. Both keep their last [`ChiSquareOutcome`] around for reporting.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::error::{Result, TestError};

/// Statistic, degrees of freedom and p-value of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareOutcome {
    pub statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
}

/// Chi-square survival function, `P(X > statistic)` for `df` degrees of
/// freedom.
///
/// A statistic of zero or less returns exactly 1.0.
pub fn chisq_sf(statistic: f64, df: f64) -> Result<f64> {
    if !statistic.is_finite() {
        return Err(TestError::NumericDomain(format!(
            "chi-square statistic is {statistic}"
        )));
    }
    if !(df.is_finite() && df > 0.0) {
        return Err(TestError::Configuration(format!(
            "chi-square needs positive degrees of freedom, got {df}"
        )));
    }
    if statistic <= 0.0 {
        return Ok(1.0);
    }
    let dist = ChiSquared::new(df)
        .map_err(|e| TestError::Configuration(format!("chi-square df={df}: {e:?}")))?;
    Ok(dist.sf(statistic).clamp(0.0, 1.0))
}

// ═══════════════════════════════════════════════════════════════════════════════
// VTest
// ═══════════════════════════════════════════════════════════════════════════════

/// One multinomial bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub observed: u64,
    pub expected: f64,
}

/// Pearson chi-square over mutually exclusive buckets.
///
/// Rare outcome classes are pooled by the caller before construction: a
/// "rank <= 29" bucket is just one more bucket with its own probability.
/// Degrees of freedom are `buckets - 1`.
#[derive(Debug, Clone)]
pub struct VTest {
    trials: u64,
    observed: Vec<u64>,
    expected: Vec<f64>,
    outcome: Option<ChiSquareOutcome>,
}

impl VTest {
    /// Buckets with expected count `trials * p` for each probability.
    pub fn new(trials: u64, probabilities: &[f64]) -> Self {
        let expected = probabilities.iter().map(|&p| trials as f64 * p).collect();
        Self::with_expected(trials, expected)
    }

    /// Buckets with explicit expected counts.
    pub fn with_expected(trials: u64, expected: Vec<f64>) -> Self {
        Self {
            trials,
            observed: vec![0; expected.len()],
            expected,
            outcome: None,
        }
    }

    /// Count one trial in `bucket`.
    pub fn tally(&mut self, bucket: usize) {
        self.observed[bucket] += 1;
    }

    /// Add `count` trials to `bucket`.
    pub fn record(&mut self, bucket: usize, count: u64) {
        self.observed[bucket] += count;
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    pub fn buckets(&self) -> Vec<Bucket> {
        self.observed
            .iter()
            .zip(&self.expected)
            .map(|(&observed, &expected)| Bucket { observed, expected })
            .collect()
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.expected.len().saturating_sub(1)
    }

    /// Pearson statistic `sum (x - y)^2 / y` after validating the buckets.
    pub fn statistic(&self) -> Result<f64> {
        if self.expected.len() < 2 {
            return Err(TestError::Configuration(format!(
                "multinomial chi-square needs at least 2 buckets, got {}",
                self.expected.len()
            )));
        }
        if let Some((i, &y)) = self
            .expected
            .iter()
            .enumerate()
            .find(|(_, y)| !(y.is_finite() && **y > 0.0))
        {
            return Err(TestError::Configuration(format!(
                "expected count in bucket {i} must be positive, got {y}"
            )));
        }
        let total: u64 = self.observed.iter().sum();
        if total != self.trials {
            return Err(TestError::InvariantViolation(format!(
                "buckets hold {total} observations but {} trials were declared",
                self.trials
            )));
        }
        Ok(self
            .observed
            .iter()
            .zip(&self.expected)
            .map(|(&x, &y)| {
                let diff = x as f64 - y;
                diff * diff / y
            })
            .sum())
    }

    /// Evaluate the buckets and return the p-value.
    pub fn evaluate(&mut self) -> Result<f64> {
        let chi2 = self.statistic()?;
        let df = self.degrees_of_freedom() as f64;
        let p_value = chisq_sf(chi2, df)?;
        log::debug!("vtest: chisq={chi2:.4}, df={df}, p={p_value:.6}");
        self.outcome = Some(ChiSquareOutcome {
            statistic: chi2,
            degrees_of_freedom: df,
            p_value,
        });
        Ok(p_value)
    }

    /// Result of the last [`evaluate`](Self::evaluate), if any.
    pub fn outcome(&self) -> Option<ChiSquareOutcome> {
        self.outcome
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NTest
// ═══════════════════════════════════════════════════════════════════════════════

/// One independent Bernoulli-count site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinomialSlot {
    pub observed: u64,
    pub trials: u64,
    pub probability: f64,
}

impl BinomialSlot {
    pub fn mean(&self) -> f64 {
        self.trials as f64 * self.probability
    }

    pub fn variance(&self) -> f64 {
        self.mean() * (1.0 - self.probability)
    }
}

/// Sum of squared standardized binomial deviations, chi-square with one
/// degree of freedom per slot.
#[derive(Debug, Clone, Default)]
pub struct NTest {
    slots: Vec<BinomialSlot>,
    outcome: Option<ChiSquareOutcome>,
}

impl NTest {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` slots sharing the same trial count and probability.
    pub fn uniform(count: usize, trials: u64, probability: f64) -> Self {
        let mut ntest = Self::new();
        for _ in 0..count {
            ntest.push_slot(trials, probability);
        }
        ntest
    }

    pub fn push_slot(&mut self, trials: u64, probability: f64) {
        self.slots.push(BinomialSlot {
            observed: 0,
            trials,
            probability,
        });
    }

    /// Count one success in `slot`.
    pub fn tally(&mut self, slot: usize) {
        self.slots[slot].observed += 1;
    }

    /// Add `count` successes to `slot`.
    pub fn record(&mut self, slot: usize, count: u64) {
        self.slots[slot].observed += count;
    }

    pub fn slots(&self) -> &[BinomialSlot] {
        &self.slots
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.slots.len()
    }

    /// Standardized deviation of every slot.
    pub fn z_scores(&self) -> Result<Vec<f64>> {
        if self.slots.is_empty() {
            return Err(TestError::Configuration(
                "binomial chi-square needs at least one slot".to_string(),
            ));
        }
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let variance = slot.variance();
                if !(variance.is_finite() && variance > 0.0) {
                    return Err(TestError::Configuration(format!(
                        "slot {i} has zero variance (n={}, p={})",
                        slot.trials, slot.probability
                    )));
                }
                Ok((slot.observed as f64 - slot.mean()) / variance.sqrt())
            })
            .collect()
    }

    pub fn statistic(&self) -> Result<f64> {
        Ok(self.z_scores()?.iter().map(|z| z * z).sum())
    }

    /// Evaluate the slots and return the p-value.
    pub fn evaluate(&mut self) -> Result<f64> {
        let chi2 = self.statistic()?;
        let df = self.degrees_of_freedom() as f64;
        let p_value = chisq_sf(chi2, df)?;
        log::debug!("ntest: chisq={chi2:.4}, df={df}, p={p_value:.6}");
        self.outcome = Some(ChiSquareOutcome {
            statistic: chi2,
            degrees_of_freedom: df,
            p_value,
        });
        Ok(p_value)
    }

    pub fn outcome(&self) -> Option<ChiSquareOutcome> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sf_of_zero_is_exactly_one() {
        assert_eq!(chisq_sf(0.0, 3.0).unwrap(), 1.0);
        assert_eq!(chisq_sf(-2.0, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_sf_known_values() {
        // Median of chi-square(2) is 2 ln 2.
        let p = chisq_sf(2.0 * 2.0_f64.ln(), 2.0).unwrap();
        assert!((p - 0.5).abs() < 1e-9, "p={p}");
        // 95th percentile of chi-square(1) is 3.841459.
        let p = chisq_sf(3.841459, 1.0).unwrap();
        assert!((p - 0.05).abs() < 1e-5, "p={p}");
    }

    #[test]
    fn test_sf_rejects_non_finite_statistic() {
        assert!(matches!(
            chisq_sf(f64::NAN, 3.0),
            Err(TestError::NumericDomain(_))
        ));
        assert!(matches!(
            chisq_sf(f64::INFINITY, 3.0),
            Err(TestError::NumericDomain(_))
        ));
    }

    #[test]
    fn test_sf_rejects_bad_df() {
        assert!(matches!(
            chisq_sf(1.0, 0.0),
            Err(TestError::Configuration(_))
        ));
    }

    #[test]
    fn test_vtest_exact_match_gives_p_one() {
        let mut vtest = VTest::new(100, &[0.25, 0.25, 0.25, 0.25]);
        for bucket in 0..4 {
            vtest.record(bucket, 25);
        }
        assert_eq!(vtest.evaluate().unwrap(), 1.0);
        let outcome = vtest.outcome().unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert_eq!(outcome.degrees_of_freedom, 3.0);
    }

    #[test]
    fn test_vtest_statistic_by_hand() {
        let mut vtest = VTest::with_expected(60, vec![20.0, 20.0, 20.0]);
        vtest.record(0, 30);
        vtest.record(1, 20);
        vtest.record(2, 10);
        // (10^2 + 0 + 10^2) / 20 = 10, df = 2, sf = exp(-5)
        let p = vtest.evaluate().unwrap();
        assert!((vtest.outcome().unwrap().statistic - 10.0).abs() < 1e-12);
        assert!((p - (-5.0_f64).exp()).abs() < 1e-9, "p={p}");
    }

    #[test]
    fn test_vtest_rejects_zero_expected() {
        let mut vtest = VTest::with_expected(10, vec![10.0, 0.0]);
        vtest.record(0, 10);
        assert!(matches!(
            vtest.evaluate(),
            Err(TestError::Configuration(_))
        ));
    }

    #[test]
    fn test_vtest_rejects_single_bucket() {
        let mut vtest = VTest::new(5, &[1.0]);
        vtest.record(0, 5);
        assert!(matches!(
            vtest.evaluate(),
            Err(TestError::Configuration(_))
        ));
    }

    #[test]
    fn test_vtest_rejects_mismatched_totals() {
        let mut vtest = VTest::new(10, &[0.5, 0.5]);
        vtest.tally(0);
        assert!(matches!(
            vtest.evaluate(),
            Err(TestError::InvariantViolation(_))
        ));
        assert!(vtest.outcome().is_none());
    }

    #[test]
    fn test_ntest_exact_match_gives_p_one() {
        let mut ntest = NTest::uniform(8, 100, 0.5);
        for slot in 0..8 {
            ntest.record(slot, 50);
        }
        assert_eq!(ntest.evaluate().unwrap(), 1.0);
        assert_eq!(ntest.outcome().unwrap().degrees_of_freedom, 8.0);
    }

    #[test]
    fn test_ntest_z_scores() {
        let mut ntest = NTest::new();
        ntest.push_slot(100, 0.5);
        ntest.push_slot(400, 0.25);
        ntest.record(0, 60); // (60 - 50) / 5 = 2
        ntest.record(1, 85); // (85 - 100) / sqrt(75)
        let z = ntest.z_scores().unwrap();
        assert!((z[0] - 2.0).abs() < 1e-12);
        assert!((z[1] + 15.0 / 75.0_f64.sqrt()).abs() < 1e-12);
        let chi2 = ntest.statistic().unwrap();
        assert!((chi2 - (4.0 + 225.0 / 75.0)).abs() < 1e-9);
    }

    #[test]
    fn test_ntest_guards_zero_variance() {
        for p in [0.0, 1.0] {
            let mut ntest = NTest::uniform(2, 10, p);
            assert!(matches!(
                ntest.evaluate(),
                Err(TestError::Configuration(_))
            ));
        }
        let mut ntest = NTest::uniform(2, 0, 0.5);
        assert!(matches!(
            ntest.evaluate(),
            Err(TestError::Configuration(_))
        ));
    }

    #[test]
    fn test_ntest_large_deviation_fails() {
        let mut ntest = NTest::uniform(4, 10_000, 0.5);
        for slot in 0..4 {
            ntest.record(slot, 5_400);
        }
        assert!(ntest.evaluate().unwrap() < 1e-10);
    }
}
