//! Seeded randomized sweep over the planner's input space.
//!
//! Every sample runs the full pipeline, then the plan's guarantees are
//! re-checked independently. Failures are inputs worth turning into tests.

pub mod evaluation;
pub mod output;
pub mod run;
pub mod sample;

pub use evaluation::{Outcome, SampleResult, evaluate_sample};
pub use output::{print_summary, write_csv};
pub use run::{SweepConfig, SweepSummary, run_sweep};
pub use sample::{SampleRanges, random_inputs};
