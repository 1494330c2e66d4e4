//! Integration tests for rngsieve-tests.
//!
//! These run real generators through the sampling driver and the
//! aggregator, with sample counts cut down so the suite stays quick.

use rngsieve_core::{RngSource, create_generator};
use rngsieve_tests::{
    Aggregator, RunConfig, TestDescriptor, Verdict, evaluate_test, find_test, run_battery,
    run_test,
};

fn quick(tsamples: usize, psamples: usize) -> RunConfig {
    RunConfig {
        tsamples: Some(tsamples),
        psamples: Some(psamples),
        bits: 32,
        ..RunConfig::default()
    }
}

fn tests(names: &[&str]) -> Vec<&'static TestDescriptor> {
    names.iter().map(|n| find_test(n).unwrap()).collect()
}

#[test]
fn good_generator_is_not_rejected() {
    let mut rng = create_generator("stdrng", 2024).unwrap();
    let selection = tests(&[
        "diehard_rank_32x32",
        "diehard_rank_6x8",
        "rgb_bitdist",
        "rgb_bitpair_01",
        "rgb_bitpair_11",
    ]);
    let results = run_battery(rng.as_mut(), &selection, &quick(2_000, 20)).unwrap();
    for r in &results {
        assert!(r.error.is_none(), "{}: {:?}", r.name, r.error);
        assert_ne!(r.verdict, Verdict::Failed, "{} p={:?}", r.name, r.p_value);
        assert_eq!(r.pvalues.len(), 20);
    }
}

#[test]
fn good_generator_count_1s() {
    let mut rng = create_generator("smallrng", 77).unwrap();
    let test = find_test("diehard_count_1s_stream").unwrap();
    let result = evaluate_test(rng.as_mut(), test, &quick(50_000, 10));
    assert!(result.error.is_none());
    assert_ne!(result.verdict, Verdict::Failed, "p={:?}", result.p_value);
}

#[test]
fn randu_fails_bit_distribution() {
    let mut rng = create_generator("randu", 1).unwrap();
    let test = find_test("rgb_bitdist").unwrap();
    let result = evaluate_test(rng.as_mut(), test, &quick(1_000, 20));
    assert_eq!(result.verdict, Verdict::Failed);
    assert!(result.fails_hard());
}

#[test]
fn counter_fails_rank() {
    let mut rng = create_generator("counter", 1).unwrap();
    let test = find_test("diehard_rank_32x32").unwrap();
    let result = evaluate_test(rng.as_mut(), test, &quick(100, 20));
    assert_eq!(result.verdict, Verdict::Failed);
    assert_eq!(result.grade, 'F');
}

#[test]
fn same_seed_same_series() {
    let test = find_test("rgb_bitpair_10").unwrap();
    let config = quick(500, 8);
    let mut a = create_generator("lcg64", 9).unwrap();
    let mut b = create_generator("lcg64", 9).unwrap();
    let ra = run_test(a.as_mut(), test, &config).unwrap();
    let rb = run_test(b.as_mut(), test, &config).unwrap();
    assert_eq!(ra.pvalues, rb.pvalues);
    assert_eq!(ra.aggregate, rb.aggregate);
}

#[test]
fn aggregator_choice_is_respected() {
    let mut rng = create_generator("stdrng", 5).unwrap();
    let test = find_test("rgb_bitdist").unwrap();
    let config = RunConfig {
        aggregator: Aggregator::KolmogorovSmirnov,
        ..quick(200, 4)
    };
    let outcome = run_test(rng.as_mut(), test, &config).unwrap();
    assert_eq!(outcome.aggregate.method, Aggregator::KolmogorovSmirnov);
}

#[test]
fn reseeding_still_yields_valid_pvalues() {
    let mut rng = create_generator("stdrng", 5).unwrap();
    let test = find_test("rgb_bitdist").unwrap();
    let config = RunConfig {
        reseed: true,
        ..quick(200, 4)
    };
    let outcome = run_test(rng.as_mut(), test, &config).unwrap();
    assert_eq!(outcome.pvalues.len(), 4);
    assert!(outcome.pvalues.as_slice().iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn shortest_bit_strings_are_accepted() {
    let mut rng = create_generator("stdrng", 5).unwrap();
    let config = RunConfig {
        bits: 2,
        ..quick(200, 3)
    };
    let selection = tests(&["rgb_bitdist", "rgb_bitpair_00"]);
    let results = run_battery(rng.as_mut(), &selection, &config).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.error.is_none()));
}

#[test]
fn one_bit_strings_reject_the_whole_run() {
    let mut rng = create_generator("stdrng", 5).unwrap();
    let config = RunConfig {
        bits: 1,
        ..quick(200, 3)
    };
    let selection = tests(&["rgb_bitdist"]);
    assert!(run_battery(rng.as_mut(), &selection, &config).is_err());
}

/// Summary of aggregated p-values over many series of uniform draws.
fn aggregate_many(aggregator: Aggregator, seed: u64) -> (f64, f64) {
    const SERIES: usize = 2_000;
    let mut rng = create_generator("stdrng", seed).unwrap();
    let mut draw = || f64::from(rng.next_u32()) / 4_294_967_296.0;

    let aggregated: Vec<f64> = (0..SERIES)
        .map(|_| {
            let series: Vec<f64> = (0..100).map(|_| draw()).collect();
            aggregator.aggregate(&series).unwrap().p_value
        })
        .collect();

    let mean = aggregated.iter().sum::<f64>() / SERIES as f64;
    let tail = aggregated.iter().filter(|&&p| p < 0.05).count() as f64 / SERIES as f64;
    (mean, tail)
}

// Both statistics compare p_(i) with i/m only, which shrinks them by about
// 1/m. Under the null the aggregated p-values sit above uniform: the mean is
// above 0.5 and the 5% tail holds fewer than 5% of runs.
#[test]
fn kuiper_aggregate_is_conservative_under_the_null() {
    let (mean, tail) = aggregate_many(Aggregator::Kuiper, 31337);
    assert!((0.57..=0.67).contains(&mean), "mean={mean}");
    assert!((0.005..=0.05).contains(&tail), "tail={tail}");
}

#[test]
fn ks_aggregate_is_conservative_under_the_null() {
    let (mean, tail) = aggregate_many(Aggregator::KolmogorovSmirnov, 4242);
    assert!((0.52..=0.62).contains(&mean), "mean={mean}");
    assert!(tail <= 0.05, "tail={tail}");
}
