use crate::error::Result;
use crate::models::{Plan, PlannerInputs};
use crate::planner::allocation::allocate;
use crate::planner::feasibility::ensure_feasible;
use crate::planner::placement::place_slots;
use crate::planner::validation::validate_plan;

/// Build a validated plan for one day.
///
/// Runs feasibility repair, slot placement, allocation and validation in
/// that order. Any failure aborts the whole computation; no partial plan is
/// ever returned.
pub fn compute_plan(inputs: &PlannerInputs) -> Result<Plan> {
    let feasibility = ensure_feasible(inputs)?;
    let adjusted = feasibility.inputs;

    let placed = place_slots(&adjusted)?;
    let slots = allocate(
        &placed,
        &adjusted.totals,
        adjusted.preset,
        adjusted.training_day,
    )?;

    let plan = Plan {
        slots,
        inputs: adjusted,
        relaxations: feasibility.relaxations,
    };
    validate_plan(&plan, &inputs.totals)?;

    tracing::info!(
        meals = plan.len(),
        fixed = plan.fixed_count(),
        relaxed = plan.relaxations.len(),
        preset = %plan.inputs.preset,
        "plan computed"
    );
    Ok(plan)
}
