use std::io::Write;
use std::time::Instant;

use rngsieve_core::{create_generator, resolve_seed};
use rngsieve_tests::{
    Aggregator, PValueSeries, RunConfig, TestDescriptor, TestResult, Verdict, all_tests,
    calculate_quality_score, evaluate_test, find_test,
};

use super::fail;

const HISTOGRAM_BINS: usize = 10;
const HISTOGRAM_WIDTH: usize = 40;

pub struct RunCommandConfig<'a> {
    pub generator: &'a str,
    pub seed: Option<u64>,
    pub tests: &'a [String],
    pub tsamples: Option<usize>,
    pub psamples: Option<usize>,
    pub bits: usize,
    pub kolmogorov_smirnov: bool,
    pub reseed: bool,
    pub histogram: bool,
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: RunCommandConfig<'_>) {
    let seed = resolve_seed(cfg.seed).unwrap_or_else(|e| fail(e));
    let mut rng = create_generator(cfg.generator, seed).unwrap_or_else(|e| fail(e));
    log::info!("generator {} seeded with {seed}", rng.name());

    let selection: Vec<&TestDescriptor> = if cfg.tests.is_empty() {
        all_tests().iter().collect()
    } else {
        cfg.tests
            .iter()
            .map(|key| find_test(key).unwrap_or_else(|e| fail(e)))
            .collect()
    };

    let config = RunConfig {
        tsamples: cfg.tsamples,
        psamples: cfg.psamples,
        bits: cfg.bits,
        aggregator: if cfg.kolmogorov_smirnov {
            Aggregator::KolmogorovSmirnov
        } else {
            Aggregator::Kuiper
        },
        reseed: cfg.reseed,
    };
    if let Err(e) = config.validate() {
        fail(e);
    }

    println!(
        "Running {} test(s) against {} (seed {seed}, {} aggregation)...\n",
        selection.len(),
        rng.name(),
        config.aggregator
    );

    let mut results = Vec::with_capacity(selection.len());
    for test in selection {
        print!("  {:<26}", test.name);
        let _ = std::io::stdout().flush();

        let t0 = Instant::now();
        let result = evaluate_test(rng.as_mut(), test, &config);
        let elapsed = t0.elapsed().as_secs_f64();

        print_line(&result, elapsed);
        if cfg.histogram && !result.pvalues.is_empty() {
            print_histogram(&PValueSeries::from(result.pvalues.clone()));
        }
        results.push(result);
    }

    print_summary(&results);

    if let Some(path) = cfg.output_path {
        let json = serde_json::json!({
            "generator": rng.name(),
            "seed": seed,
            "config": &config,
            "score": calculate_quality_score(&results),
            "results": &results,
        });
        match serde_json::to_string_pretty(&json) {
            Ok(text) => match std::fs::write(path, text) {
                Ok(()) => println!("\nResults written to {path}"),
                Err(e) => eprintln!("\nFailed to write {path}: {e}"),
            },
            Err(e) => eprintln!("\nFailed to serialize results: {e}"),
        }
    }
}

fn print_line(result: &TestResult, elapsed: f64) {
    match result.p_value {
        Some(p) => println!(
            " p = {p:.8}  {}  {:<6} [{elapsed:.1}s]",
            result.grade,
            result.verdict.to_string()
        ),
        None => println!(
            " ✗ {}",
            result.error.as_deref().unwrap_or("no p-value")
        ),
    }
    if result.fails_hard() && result.p_value.is_some() {
        println!(
            "    Generator {} FAILS at 0.01% for {}.",
            result.generator, result.name
        );
    }
}

fn print_histogram(series: &PValueSeries) {
    let counts = series.histogram(HISTOGRAM_BINS);
    let peak = counts.iter().copied().max().unwrap_or(0).max(1);
    let width = HISTOGRAM_WIDTH;
    for (i, &count) in counts.iter().enumerate() {
        let lo = i as f64 / HISTOGRAM_BINS as f64;
        let bar = "#".repeat(count * HISTOGRAM_WIDTH / peak);
        println!("      {lo:.1}-{:.1} |{bar:<width$}| {count}", lo + 0.1);
    }
}

fn print_summary(results: &[TestResult]) {
    let score = calculate_quality_score(results);
    let passed = results.iter().filter(|r| r.verdict == Verdict::Passed).count();
    let weak = results.iter().filter(|r| r.verdict == Verdict::Weak).count();
    let failed = results.iter().filter(|r| r.verdict == Verdict::Failed).count();

    println!("\n{}", "=".repeat(60));
    println!(
        "{:<28} {:>12} {:>6} {:>8}",
        "Test", "p-value", "Grade", "Verdict"
    );
    println!("{}", "-".repeat(60));
    for r in results {
        let pval = r
            .p_value
            .map(|p| format!("{p:.8}"))
            .unwrap_or_else(|| "—".to_string());
        println!(
            "  {:<26} {:>12} {:>6} {:>8}",
            r.name,
            pval,
            r.grade,
            r.verdict.to_string()
        );
    }
    println!("{}", "-".repeat(60));
    println!(
        "  Score {score:.1}/100: {passed} passed, {weak} weak, {failed} failed"
    );
}
