//! CLI for rngsieve: diehard-style tests against seedable generators.

mod commands;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rngsieve")]
#[command(about = "rngsieve: diehard-style statistical tests for random number generators")]
#[command(version = rngsieve_core::VERSION)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available generators and tests with their numbers
    List,

    /// Run tests against one generator
    Run {
        /// Generator name or number (see `rngsieve list`)
        #[arg(long, short = 'g', default_value = "stdrng")]
        generator: String,

        /// Seed; 0 or absent draws one from OS entropy
        #[arg(long, short = 's')]
        seed: Option<u64>,

        /// Test name or number; repeat for several. Default: all tests
        #[arg(long = "test", short = 'd')]
        tests: Vec<String>,

        /// Override trials per invocation
        #[arg(long, short = 't')]
        tsamples: Option<usize>,

        /// Override invocations per test
        #[arg(long, short = 'p')]
        psamples: Option<usize>,

        /// Bit-string length for the rgb_* tests
        #[arg(long, short = 'n', default_value_t = rngsieve_tests::DEFAULT_BITS)]
        bits: usize,

        /// Aggregate with Kolmogorov-Smirnov instead of Kuiper
        #[arg(long)]
        ks: bool,

        /// Reseed from OS entropy before every invocation
        #[arg(long)]
        reseed: bool,

        /// Print a histogram of each test's p-values
        #[arg(long)]
        histogram: bool,

        /// Write results as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Write raw generator output for external tools
    Dump {
        /// Generator name or number (see `rngsieve list`)
        #[arg(long, short = 'g', default_value = "stdrng")]
        generator: String,

        /// Seed; 0 or absent draws one from OS entropy
        #[arg(long, short = 's')]
        seed: Option<u64>,

        /// Number of 32-bit words (0 = unlimited)
        #[arg(long, short = 'w', default_value_t = 0)]
        words: usize,

        /// Output format
        #[arg(long, default_value = "raw", value_parser = ["raw", "hex"])]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::List => commands::list::run(),
        Commands::Run {
            generator,
            seed,
            tests,
            tsamples,
            psamples,
            bits,
            ks,
            reseed,
            histogram,
            output,
        } => commands::run::run(commands::run::RunCommandConfig {
            generator: &generator,
            seed,
            tests: &tests,
            tsamples,
            psamples,
            bits,
            kolmogorov_smirnov: ks,
            reseed,
            histogram,
            output_path: output.as_deref(),
        }),
        Commands::Dump {
            generator,
            seed,
            words,
            format,
            output,
        } => commands::dump::run(&generator, seed, words, &format, output.as_deref()),
    }
}
