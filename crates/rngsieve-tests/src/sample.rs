//! The sampling driver: run a test body `psamples` times and fold the
//! resulting p-values into one.

use rngsieve_core::{RngSource, random_seed};
use serde::Serialize;

use crate::error::{Result, TestError};
use crate::kstest::{Aggregate, Aggregator};

/// p-values collected from successive invocations, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PValueSeries(Vec<f64>);

impl PValueSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    /// Counts of p-values in `bins` equal-width bins over [0,1]. A p-value
    /// of exactly 1 lands in the last bin.
    pub fn histogram(&self, bins: usize) -> Vec<usize> {
        let mut counts = vec![0usize; bins];
        if bins == 0 {
            return counts;
        }
        for &p in &self.0 {
            let idx = ((p * bins as f64) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        counts
    }
}

impl From<Vec<f64>> for PValueSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Push-only handle given to a test body for one invocation.
pub struct PValueSink<'a> {
    series: &'a mut Vec<f64>,
    pushed: usize,
}

impl PValueSink<'_> {
    pub fn push(&mut self, p_value: f64) {
        self.series.push(p_value);
        self.pushed += 1;
    }
}

/// A filled series and its cumulative verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleOutcome {
    pub pvalues: PValueSeries,
    pub aggregate: Aggregate,
}

impl SampleOutcome {
    pub fn p_value(&self) -> f64 {
        self.aggregate.p_value
    }
}

/// Runs a test body `psamples` times, one p-value per invocation.
#[derive(Debug, Clone)]
pub struct Sampler {
    label: String,
    psamples: usize,
    aggregator: Aggregator,
    reseed: bool,
}

impl Sampler {
    pub fn new(psamples: usize, aggregator: Aggregator) -> Result<Self> {
        if psamples == 0 {
            return Err(TestError::Configuration(
                "psamples must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            label: "sample".to_string(),
            psamples,
            aggregator,
            reseed: false,
        })
    }

    /// Name used in log lines.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Reseed the generator from OS entropy before every invocation.
    pub fn with_reseed(mut self, reseed: bool) -> Self {
        self.reseed = reseed;
        self
    }

    pub fn psamples(&self) -> usize {
        self.psamples
    }

    /// Drive a test body that returns its p-value.
    pub fn sample<F>(&self, rng: &mut dyn RngSource, mut test_fn: F) -> Result<SampleOutcome>
    where
        F: FnMut(&mut dyn RngSource) -> Result<f64>,
    {
        self.sample_into(rng, |rng, sink| {
            let p = test_fn(rng)?;
            sink.push(p);
            Ok(())
        })
    }

    /// Drive a test body that pushes its p-value into a sink.
    ///
    /// Every invocation must push exactly one value; anything else aborts the
    /// whole sample with [`TestError::InvariantViolation`].
    pub fn sample_into<F>(&self, rng: &mut dyn RngSource, mut test_fn: F) -> Result<SampleOutcome>
    where
        F: FnMut(&mut dyn RngSource, &mut PValueSink<'_>) -> Result<()>,
    {
        let mut series = Vec::with_capacity(self.psamples);

        for invocation in 0..self.psamples {
            if self.reseed {
                let seed = random_seed()?;
                log::trace!("{}: reseeding {} with {seed}", self.label, rng.name());
                rng.reseed(seed);
            }

            let mut sink = PValueSink {
                series: &mut series,
                pushed: 0,
            };
            test_fn(&mut *rng, &mut sink)?;
            if sink.pushed != 1 {
                return Err(TestError::InvariantViolation(format!(
                    "{}: invocation {invocation} produced {} p-values, expected exactly 1",
                    self.label, sink.pushed
                )));
            }

            let p = series[invocation];
            if !(p.is_finite() && (0.0..=1.0).contains(&p)) {
                return Err(TestError::InvariantViolation(format!(
                    "{}: invocation {invocation} produced p-value {p} outside [0,1]",
                    self.label
                )));
            }
            log::debug!("{}: pvalues[{invocation}] = {p:.6}", self.label);
        }

        let aggregate = self.aggregator.aggregate(&series)?;
        log::info!(
            "{}: p = {:.6} from {} test on {} pvalues",
            self.label,
            aggregate.p_value,
            self.aggregator,
            series.len()
        );
        Ok(SampleOutcome {
            pvalues: PValueSeries(series),
            aggregate,
        })
    }
}
