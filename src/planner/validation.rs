use crate::error::{Result, Violation};
use crate::models::{DailyTotals, Nutrient, Plan};
use crate::planner::constants::ENERGY_TOLERANCE_KCAL;

/// Re-derive the plan's guarantees from its slots alone.
///
/// Checks slot count, strict time ordering, exact macro sums and energy
/// within tolerance. The first failing property is returned.
pub fn validate_plan(plan: &Plan, totals: &DailyTotals) -> Result<()> {
    let expected = plan.inputs.meals_target;
    if plan.slots.len() != expected {
        return Err(Violation::SlotCount {
            expected,
            actual: plan.slots.len(),
        }
        .into());
    }

    for (index, pair) in plan.slots.windows(2).enumerate() {
        let (previous, current) = (pair[0].time, pair[1].time);
        if current == previous {
            return Err(Violation::DuplicateTime { time: current }.into());
        }
        if current < previous {
            return Err(Violation::Ordering {
                index: index + 1,
                previous,
                current,
            }
            .into());
        }
    }

    for nutrient in Nutrient::ALL {
        let expected = totals.grams_target(nutrient);
        let actual = plan.total_grams(nutrient);
        if actual != expected {
            return Err(Violation::MacroConservation {
                nutrient,
                expected,
                actual,
            }
            .into());
        }
    }

    let expected = totals.energy_target();
    let actual = plan.total_energy();
    if actual.abs_diff(expected) > ENERGY_TOLERANCE_KCAL {
        return Err(Violation::EnergyConservation {
            expected,
            actual,
            tolerance: ENERGY_TOLERANCE_KCAL,
        }
        .into());
    }

    Ok(())
}
