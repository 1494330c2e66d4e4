//! Run registered tests against a generator and collect [`TestResult`]s.

use rngsieve_core::RngSource;

use crate::config::RunConfig;
use crate::error::Result;
use crate::registry::{TestDescriptor, all_tests};
use crate::sample::{SampleOutcome, Sampler};
use crate::{TestResult, Verdict};

/// Run one test, propagating any error.
pub fn run_test(
    rng: &mut dyn RngSource,
    test: &TestDescriptor,
    config: &RunConfig,
) -> Result<SampleOutcome> {
    config.validate()?;
    let params = config.params_for(test);
    let sampler = Sampler::new(config.psamples_for(test), config.aggregator)?
        .named(test.name)
        .with_reseed(config.reseed);
    log::debug!(
        "{}: tsamples={}, psamples={}, generator={}",
        test.name,
        params.tsamples,
        sampler.psamples(),
        rng.name()
    );
    sampler.sample(rng, |rng| test.kind.invoke(rng, &params))
}

/// Run one test and fold the outcome, or the error, into a [`TestResult`].
pub fn evaluate_test(
    rng: &mut dyn RngSource,
    test: &TestDescriptor,
    config: &RunConfig,
) -> TestResult {
    let generator = rng.name();
    let params = config.params_for(test);
    let psamples = config.psamples_for(test);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run_test(&mut *rng, test, config)
    }));

    match outcome {
        Ok(Ok(outcome)) => {
            let p = outcome.p_value();
            let verdict = Verdict::from_p(Some(p));
            let agg = outcome.aggregate;
            TestResult {
                name: test.name.to_string(),
                generator: generator.to_string(),
                passed: TestResult::pass_from_p(Some(p), crate::FAIL_THRESHOLD),
                p_value: Some(p),
                statistic: agg.statistic,
                details: format!(
                    "{} statistic={:.4}, x={:.4} over {} pvalues",
                    agg.method,
                    agg.statistic,
                    agg.x,
                    outcome.pvalues.len()
                ),
                grade: TestResult::grade_from_p(Some(p)),
                verdict,
                pvalues: outcome.pvalues.into_vec(),
                tsamples: params.tsamples,
                psamples,
                error: None,
            }
        }
        Ok(Err(err)) => {
            log::warn!("{} aborted on {generator}: {err}", test.name);
            TestResult::aborted(test, generator, params, psamples, &err)
        }
        Err(_) => {
            log::warn!("{} panicked on {generator}", test.name);
            let err = crate::TestError::InvariantViolation("test panicked".to_string());
            TestResult::aborted(test, generator, params, psamples, &err)
        }
    }
}

/// Run `tests` in order against one generator.
///
/// A bad configuration stops the run before any test starts. Errors inside
/// a single test are recorded in its result and the run moves on.
pub fn run_battery(
    rng: &mut dyn RngSource,
    tests: &[&TestDescriptor],
    config: &RunConfig,
) -> Result<Vec<TestResult>> {
    config.validate()?;
    log::info!("running {} tests against {}", tests.len(), rng.name());
    Ok(tests
        .iter()
        .map(|test| evaluate_test(&mut *rng, test, config))
        .collect())
}

/// Run every registered test.
pub fn run_all_tests(rng: &mut dyn RngSource, config: &RunConfig) -> Result<Vec<TestResult>> {
    let tests: Vec<&TestDescriptor> = all_tests().iter().collect();
    run_battery(rng, &tests, config)
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TestError;
    use crate::registry::find_test;
    use rngsieve_core::{Counter, Lcg64};

    fn quick_config() -> RunConfig {
        RunConfig {
            tsamples: Some(500),
            psamples: Some(5),
            bits: 16,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_run_test_fills_series() {
        let mut rng = Lcg64::new(11);
        let test = find_test("rgb_bitdist").unwrap();
        let outcome = run_test(&mut rng, test, &quick_config()).unwrap();
        assert_eq!(outcome.pvalues.len(), 5);
        assert!((0.0..=1.0).contains(&outcome.p_value()));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_running() {
        let mut rng = Counter::new(0);
        let config = RunConfig {
            psamples: Some(0),
            ..quick_config()
        };
        let tests = [find_test("rgb_bitdist").unwrap()];
        assert!(matches!(
            run_battery(&mut rng, &tests, &config),
            Err(TestError::Configuration(_))
        ));
    }

    #[test]
    fn test_counter_fails_hard() {
        let mut rng = Counter::new(0);
        let test = find_test("rgb_bitdist").unwrap();
        // Five all-zero p-values only reach p ~ 0.01 under Kuiper.
        let config = RunConfig {
            psamples: Some(20),
            ..quick_config()
        };
        let result = evaluate_test(&mut rng, test, &config);
        assert_eq!(result.generator, "counter");
        assert_eq!(result.verdict, Verdict::Failed);
        assert!(result.fails_hard());
        assert!(!result.passed);
        assert_eq!(result.pvalues.len(), 20);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_passed_agrees_with_verdict() {
        let mut rng = Lcg64::new(29);
        let test = find_test("rgb_bitdist").unwrap();
        let result = evaluate_test(&mut rng, test, &quick_config());
        assert_eq!(
            result.passed,
            TestResult::pass_from_p(result.p_value, crate::FAIL_THRESHOLD)
        );
        assert_eq!(result.passed, !result.fails_hard());
    }

    #[test]
    fn test_run_all_covers_registry() {
        let mut rng = Lcg64::new(3);
        let config = RunConfig {
            tsamples: Some(200),
            psamples: Some(2),
            bits: 8,
            ..RunConfig::default()
        };
        let results = run_all_tests(&mut rng, &config).unwrap();
        assert_eq!(results.len(), all_tests().len());
        for r in &results {
            assert!(r.error.is_none(), "{}: {:?}", r.name, r.error);
        }
    }

    #[test]
    fn test_calculate_quality_score_empty() {
        assert_eq!(calculate_quality_score(&[]), 0.0);
    }
}
