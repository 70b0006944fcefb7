use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meal_slot_planner::sweep::{SampleRanges, SweepConfig, print_summary, run_sweep, write_csv};

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Randomized invariant sweep for the meal slot planner")]
struct Args {
    /// Number of random samples
    #[arg(long, default_value = "1000")]
    iters: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Probability that a sample is a training day
    #[arg(long, default_value = "0.5")]
    training: f64,

    /// Output CSV file for every sample
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of failures to display
    #[arg(long, default_value = "10")]
    topk: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !(0.0..=1.0).contains(&args.training) {
        eprintln!("Error: --training must be between 0 and 1");
        std::process::exit(1);
    }

    let config = SweepConfig {
        iterations: args.iters,
        seed: args.seed,
        ranges: SampleRanges {
            training_probability: args.training,
            ..SampleRanges::default()
        },
    };

    println!(
        "Sweeping {} samples (seed {})...",
        config.iterations, config.seed
    );
    let summary = run_sweep(&config);
    print_summary(&summary, args.topk);

    if let Some(path) = &args.csv {
        if let Err(e) = write_csv(&summary.results, path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        println!("Wrote all samples to {:?}", path);
    }

    if summary.failures > 0 {
        std::process::exit(1);
    }
}
