use serde::Serialize;

use crate::error::PlanError;
use crate::models::PlannerInputs;
use crate::planner::{compute_plan, ensure_feasible};

/// What happened to one sampled input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    /// A validated plan came back and re-checks passed.
    Planned { meals: usize, fixed: usize, relaxed: usize },
    /// Free meals still did not fit after every optional anchor was dropped.
    Infeasible { reason: String },
    /// Inputs rejected up front.
    Rejected { reason: String },
    /// The validator caught a broken plan.
    Violated { reason: String },
    /// Feasibility repair changed its own output on a second pass.
    NotIdempotent,
    /// Two runs over the same inputs disagreed.
    Nondeterministic,
}

impl Outcome {
    /// Broken guarantees, as opposed to inputs that simply cannot be planned.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::Violated { .. } | Outcome::NotIdempotent | Outcome::Nondeterministic
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Planned { .. } => "planned",
            Outcome::Infeasible { .. } => "infeasible",
            Outcome::Rejected { .. } => "rejected",
            Outcome::Violated { .. } => "violated",
            Outcome::NotIdempotent => "not_idempotent",
            Outcome::Nondeterministic => "nondeterministic",
        }
    }
}

/// One sweep sample and its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct SampleResult {
    pub index: usize,
    pub inputs: PlannerInputs,
    pub outcome: Outcome,
}

/// Run the full pipeline on `inputs` and re-check its guarantees.
pub fn evaluate_sample(index: usize, inputs: PlannerInputs) -> SampleResult {
    let outcome = match compute_plan(&inputs) {
        Ok(plan) => {
            let again = compute_plan(&inputs).ok();
            let repaired = ensure_feasible(&plan.inputs).ok();
            if again.as_ref() != Some(&plan) {
                Outcome::Nondeterministic
            } else if !repaired
                .is_some_and(|r| r.relaxations.is_empty() && r.inputs == plan.inputs)
            {
                Outcome::NotIdempotent
            } else {
                Outcome::Planned {
                    meals: plan.len(),
                    fixed: plan.fixed_count(),
                    relaxed: plan.relaxations.len(),
                }
            }
        }
        Err(PlanError::InfeasibleConstraint(reason)) => Outcome::Infeasible { reason },
        Err(PlanError::Violation(v)) => Outcome::Violated {
            reason: v.to_string(),
        },
        Err(e) => Outcome::Rejected {
            reason: e.to_string(),
        },
    };

    if outcome.is_failure() {
        tracing::warn!(index, outcome = outcome.label(), ?inputs, "sweep sample failed");
    }
    SampleResult {
        index,
        inputs,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, DailyTotals};

    fn inputs(meals: usize) -> PlannerInputs {
        let mut inputs = PlannerInputs::new(
            ClockTime::from_hm(7, 0).unwrap(),
            ClockTime::from_hm(23, 0).unwrap(),
            DailyTotals::new(2000.0, 150.0, 220.0, 60.0),
        );
        inputs.meals_target = meals;
        inputs
    }

    #[test]
    fn test_normal_day_is_planned() {
        let result = evaluate_sample(0, inputs(4));
        assert_eq!(
            result.outcome,
            Outcome::Planned {
                meals: 4,
                fixed: 2,
                relaxed: 0
            }
        );
        assert!(!result.outcome.is_failure());
    }

    #[test]
    fn test_bad_inputs_are_rejected_not_failures() {
        let mut bad = inputs(4);
        bad.min_gap_min = 0;
        let result = evaluate_sample(1, bad);
        assert_eq!(result.outcome.label(), "rejected");
        assert!(!result.outcome.is_failure());
    }

    #[test]
    fn test_crowded_day_is_infeasible() {
        let mut crowded = inputs(8);
        crowded.min_gap_min = 150;
        crowded.target_gap_min = 150;
        crowded.include_pre_sleep = false;
        let result = evaluate_sample(2, crowded);
        assert_eq!(result.outcome.label(), "infeasible");
    }
}
