//! Kolmogorov-Smirnov and Kuiper tests for uniformity of a p-value series.
//!
//! p-values from many independent invocations of a test should be uniform on
//! [0,1) if the generator is good. Both tests sort a private copy of the
//! series, measure how far the empirical distribution strays from the
//! diagonal, and turn that distance into one cumulative p-value.

use serde::Serialize;

use crate::error::{Result, TestError};

/// Terms of the asymptotic series, `i = 1..=99`.
const SERIES_TERMS: u32 = 99;

/// Below this scaled Kuiper statistic the asymptotic series is unstable and
/// the p-value is reported as exactly 1.
pub const KUIPER_CUTOFF: f64 = 0.4;

/// Which uniformity test folds the series into one p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Aggregator {
    KolmogorovSmirnov,
    #[default]
    Kuiper,
}

impl Aggregator {
    pub fn aggregate(self, pvalues: &[f64]) -> Result<Aggregate> {
        match self {
            Self::KolmogorovSmirnov => kstest(pvalues),
            Self::Kuiper => kuiper(pvalues),
        }
    }
}

impl std::fmt::Display for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KolmogorovSmirnov => write!(f, "Kolmogorov-Smirnov"),
            Self::Kuiper => write!(f, "Kuiper KS"),
        }
    }
}

/// Outcome of one uniformity test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub method: Aggregator,
    /// D for KS, V for Kuiper.
    pub statistic: f64,
    /// Statistic after the finite-sample scaling.
    pub x: f64,
    pub p_value: f64,
}

fn sorted_copy(pvalues: &[f64]) -> Result<Vec<f64>> {
    if pvalues.is_empty() {
        return Err(TestError::Configuration(
            "cannot aggregate an empty p-value series".to_string(),
        ));
    }
    if let Some(bad) = pvalues.iter().find(|p| !p.is_finite()) {
        return Err(TestError::NumericDomain(format!(
            "p-value series contains {bad}"
        )));
    }
    let mut sorted = pvalues.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// Kolmogorov-Smirnov test of the series against Uniform(0,1).
pub fn kstest(pvalues: &[f64]) -> Result<Aggregate> {
    let sorted = sorted_copy(pvalues)?;
    let m = sorted.len() as f64;

    let mut d_max = 0.0f64;
    for (i, &p) in sorted.iter().enumerate() {
        let d = (p - i as f64 / m).abs();
        if d > d_max {
            d_max = d;
        }
    }

    let sqrt_m = m.sqrt();
    let x = (sqrt_m + 0.12 + 0.11 / sqrt_m) * d_max;
    let p = q_ks(x);
    log::debug!("Kolmogorov-Smirnov D = {d_max:.6}, q_ks({x:.4}) = {p:.6}");
    Ok(Aggregate {
        method: Aggregator::KolmogorovSmirnov,
        statistic: d_max,
        x,
        p_value: p,
    })
}

/// Kolmogorov distribution tail, `2 sum (-1)^(i-1) exp(-2 i^2 x^2)`.
pub fn q_ks(x: f64) -> f64 {
    let kappa = -2.0 * x * x;
    let mut sum = 0.0;
    for i in 1..=SERIES_TERMS {
        let sign = if i % 2 == 1 { 1.0 } else { -1.0 };
        let i = f64::from(i);
        sum += sign * (kappa * i * i).exp();
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Kuiper's variant: largest excursion above the diagonal plus largest
/// excursion below it. Invariant under cyclic shifts of [0,1).
pub fn kuiper(pvalues: &[f64]) -> Result<Aggregate> {
    let sorted = sorted_copy(pvalues)?;
    let m = sorted.len() as f64;

    let mut v_max = 0.0f64;
    let mut v_min = 0.0f64;
    for (i, &p) in sorted.iter().enumerate() {
        let v = p - i as f64 / m;
        if v > v_max {
            v_max = v;
        } else if v < v_min {
            v_min = v;
        }
    }
    let v = v_max.abs() + v_min.abs();

    let sqrt_m = m.sqrt();
    let x = (sqrt_m + 0.155 + 0.24 / sqrt_m) * v;
    let p = q_ks_kuiper(x);
    log::debug!("Kuiper V = {v:.6}, q_ks_kuiper({x:.4}) = {p:.6}");
    Ok(Aggregate {
        method: Aggregator::Kuiper,
        statistic: v,
        x,
        p_value: p,
    })
}

/// Kuiper tail, `2 sum (4 i^2 x^2 - 1) exp(-2 i^2 x^2)`; exactly 1 below
/// [`KUIPER_CUTOFF`].
pub fn q_ks_kuiper(x: f64) -> f64 {
    if x < KUIPER_CUTOFF {
        return 1.0;
    }
    let x2 = x * x;
    let mut sum = 0.0;
    for i in 1..=SERIES_TERMS {
        let i2 = f64::from(i * i);
        sum += (4.0 * i2 * x2 - 1.0) * (-2.0 * i2 * x2).exp();
    }
    (2.0 * sum).clamp(0.0, 1.0)
}
