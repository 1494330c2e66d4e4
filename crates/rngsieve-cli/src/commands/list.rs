use rngsieve_core::available_generators;
use rngsieve_tests::all_tests;

pub fn run() {
    let generators = available_generators();
    println!("Generators ({}):\n", generators.len());
    for (i, info) in generators.iter().enumerate() {
        println!(
            "  {:>2}  {:<12} {:<8} {}",
            i,
            info.name,
            info.quality.to_string(),
            info.description
        );
    }

    let tests = all_tests();
    println!("\nTests ({}):\n", tests.len());
    for (i, test) in tests.iter().enumerate() {
        println!(
            "  {:>2}  {:<26} t={:<7} p={:<4} {}",
            i, test.name, test.tsamples, test.psamples, test.description
        );
    }
}
