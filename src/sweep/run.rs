use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::sweep::evaluation::{Outcome, SampleResult, evaluate_sample};
use crate::sweep::sample::{SampleRanges, random_inputs};

/// Configuration for a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub iterations: usize,
    pub seed: u64,
    pub ranges: SampleRanges,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: 123,
            ranges: SampleRanges::default(),
        }
    }
}

/// Aggregated sweep results.
#[derive(Debug, Clone, Default)]
pub struct SweepSummary {
    pub results: Vec<SampleResult>,
    pub planned: usize,
    /// Plans that needed at least one anchor relaxed.
    pub relaxed: usize,
    pub infeasible: usize,
    pub rejected: usize,
    pub failures: usize,
}

impl SweepSummary {
    fn record(&mut self, result: SampleResult) {
        match &result.outcome {
            Outcome::Planned { relaxed, .. } => {
                self.planned += 1;
                if *relaxed > 0 {
                    self.relaxed += 1;
                }
            }
            Outcome::Infeasible { .. } => self.infeasible += 1,
            Outcome::Rejected { .. } => self.rejected += 1,
            _ => self.failures += 1,
        }
        self.results.push(result);
    }

    pub fn failed(&self) -> impl Iterator<Item = &SampleResult> {
        self.results.iter().filter(|r| r.outcome.is_failure())
    }
}

/// Draw `iterations` random inputs from a seeded RNG and run each through
/// the planner. The same seed always produces the same summary.
pub fn run_sweep(config: &SweepConfig) -> SweepSummary {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut summary = SweepSummary::default();

    for i in 0..config.iterations {
        let inputs = random_inputs(&mut rng, &config.ranges);
        summary.record(evaluate_sample(i, inputs));

        // Progress indicator every 10%
        if (i + 1) % (config.iterations / 10).max(1) == 0 {
            let pct = ((i + 1) as f64 / config.iterations as f64) * 100.0;
            eprint!("\r{:.0}% complete", pct);
        }
    }
    eprintln!();

    tracing::info!(
        iterations = config.iterations,
        seed = config.seed,
        planned = summary.planned,
        infeasible = summary.infeasible,
        failures = summary.failures,
        "sweep finished"
    );
    summary
}
