use std::path::Path;

use crate::error::Result;
use crate::sweep::evaluation::{Outcome, SampleResult};
use crate::sweep::run::SweepSummary;

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Write one row per sample to a CSV file.
pub fn write_csv(results: &[SampleResult], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "index",
        "wake",
        "sleep",
        "training_day",
        "workout",
        "meals_target",
        "min_gap_min",
        "target_gap_min",
        "preset",
        "outcome",
        "fixed",
        "relaxed",
        "detail",
    ])?;

    for r in results {
        let inputs = &r.inputs;
        let workout = inputs
            .workout
            .map(|w| format!("{}-{}", w.start, w.end))
            .unwrap_or_default();
        let (fixed, relaxed, detail) = match &r.outcome {
            Outcome::Planned { fixed, relaxed, .. } => {
                (fixed.to_string(), relaxed.to_string(), String::new())
            }
            Outcome::Infeasible { reason }
            | Outcome::Rejected { reason }
            | Outcome::Violated { reason } => (String::new(), String::new(), reason.clone()),
            Outcome::NotIdempotent | Outcome::Nondeterministic => {
                (String::new(), String::new(), String::new())
            }
        };
        wtr.write_record([
            r.index.to_string(),
            inputs.wake.to_string(),
            inputs.sleep.to_string(),
            inputs.training_day.to_string(),
            workout,
            inputs.meals_target.to_string(),
            inputs.min_gap_min.to_string(),
            inputs.target_gap_min.to_string(),
            inputs.preset.to_string(),
            r.outcome.label().to_string(),
            fixed,
            relaxed,
            detail,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print outcome counts and the first `k` failures.
pub fn print_summary(summary: &SweepSummary, k: usize) {
    let total = summary.results.len();

    println!("\n=== Sweep Summary ({} samples) ===\n", total);
    println!(
        "Planned:    {:>6} ({:.1}%), {} with relaxed anchors",
        summary.planned,
        percent(summary.planned, total),
        summary.relaxed
    );
    println!(
        "Infeasible: {:>6} ({:.1}%)",
        summary.infeasible,
        percent(summary.infeasible, total)
    );
    println!(
        "Rejected:   {:>6} ({:.1}%)",
        summary.rejected,
        percent(summary.rejected, total)
    );
    println!(
        "Failures:   {:>6} ({:.1}%)",
        summary.failures,
        percent(summary.failures, total)
    );

    if summary.failures == 0 {
        println!("\nAll plans passed validation.");
        return;
    }

    println!("\n=== First {} failures ===\n", k.min(summary.failures));
    for r in summary.failed().take(k) {
        println!("#{}: {}", r.index, r.outcome.label());
        if let Outcome::Violated { reason } = &r.outcome {
            println!("    {}", reason);
        }
        match serde_json::to_string(&r.inputs) {
            Ok(json) => println!("    {}", json),
            Err(e) => println!("    (inputs not serializable: {})", e),
        }
        println!();
    }
}
