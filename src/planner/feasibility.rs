use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{AnchorKind, PlannerInputs};
use crate::planner::placement::{
    AnchorIssue, FixedLayout, FixedPoint, free_capacity, resolve_fixed_points,
};

/// Why an optional anchor was switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelaxReason {
    /// Training day without a workout window to anchor to.
    NoWorkoutWindow,
    /// Fixed points would take every requested slot.
    TooFewSlots,
    /// Two anchors could not be spaced at the minimum gap, or one fell
    /// outside the eating window.
    AnchorConflict,
    /// The free meals did not fit between the anchors at the minimum gap.
    NoRoomForFreeMeals,
}

impl fmt::Display for RelaxReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelaxReason::NoWorkoutWindow => "no workout window on a training day",
            RelaxReason::TooFewSlots => "fixed anchors would fill every slot",
            RelaxReason::AnchorConflict => "anchors too close together or outside the day",
            RelaxReason::NoRoomForFreeMeals => "free meals do not fit at the minimum gap",
        })
    }
}

/// One optional anchor that feasibility repair turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relaxation {
    pub anchor: AnchorKind,
    pub reason: RelaxReason,
}

/// Outcome of feasibility repair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feasibility {
    /// Adjusted copy of the inputs with the anchor table filled in.
    pub inputs: PlannerInputs,
    pub relaxations: Vec<Relaxation>,
    pub fixed_points: Vec<FixedPoint>,
    pub issues: Vec<AnchorIssue>,
    pub free_meals: usize,
    pub free_capacity: usize,
    /// Every optional anchor is gone and a problem remains. With only
    /// breakfast left this usually means a single-slot day.
    pub fallback: bool,
}

impl Feasibility {
    /// Whether the placer can build slots from `inputs` as adjusted.
    pub fn is_placeable(&self) -> bool {
        self.issues.is_empty()
            && self.fixed_points.len() <= self.inputs.meals_target
            && self.free_meals <= self.free_capacity
    }
}

/// First problem found with the current anchor set, if any.
fn diagnose(inputs: &PlannerInputs, layout: &FixedLayout) -> Option<RelaxReason> {
    let fixed = layout.points.len();
    if fixed >= inputs.meals_target {
        return Some(RelaxReason::TooFewSlots);
    }
    if !layout.issues.is_empty() {
        return Some(RelaxReason::AnchorConflict);
    }
    if inputs.meals_target - fixed > free_capacity(inputs, &layout.points) {
        return Some(RelaxReason::NoRoomForFreeMeals);
    }
    None
}

/// Lowest-priority active optional anchor to drop for `reason`.
///
/// Conflicts drop one of the anchors involved; other problems drop in
/// global priority order.
fn pick_drop(
    inputs: &PlannerInputs,
    layout: &FixedLayout,
    reason: RelaxReason,
) -> Option<AnchorKind> {
    let involved: Vec<AnchorKind> = layout.issues.iter().flat_map(|i| i.anchors()).collect();
    AnchorKind::DROP_ORDER.into_iter().find(|kind| {
        inputs.includes(*kind) && (reason != RelaxReason::AnchorConflict || involved.contains(kind))
    })
}

/// Repair the inputs until the requested meal count can host every fixed
/// point, at least one free meal, and the minimum gap.
///
/// Optional anchors are switched off one at a time (post-workout first,
/// then pre-sleep, then pre-workout). `meals_target` is never reduced.
/// Running this on its own output returns the same adjusted inputs.
///
/// Only malformed inputs fail; an unrepairable configuration comes back
/// with `fallback` set.
pub fn ensure_feasible(inputs: &PlannerInputs) -> Result<Feasibility> {
    inputs.validate()?;

    let mut adjusted = inputs.with_default_anchors();
    let mut relaxations = Vec::new();

    if adjusted.training_day && adjusted.workout.is_none() {
        for kind in [AnchorKind::PostWorkout, AnchorKind::PreWorkout] {
            if adjusted.includes(kind) {
                tracing::warn!(anchor = %kind, "training day has no workout window, skipping anchor");
                adjusted.disable(kind);
                relaxations.push(Relaxation {
                    anchor: kind,
                    reason: RelaxReason::NoWorkoutWindow,
                });
            }
        }
    }

    loop {
        let layout = resolve_fixed_points(&adjusted);
        let Some(reason) = diagnose(&adjusted, &layout) else {
            return Ok(finish(adjusted, relaxations, layout, false));
        };

        match pick_drop(&adjusted, &layout, reason) {
            Some(kind) => {
                tracing::info!(anchor = %kind, %reason, "relaxing optional anchor");
                adjusted.disable(kind);
                relaxations.push(Relaxation {
                    anchor: kind,
                    reason,
                });
            }
            None => {
                tracing::debug!(%reason, "no optional anchors left to relax");
                return Ok(finish(adjusted, relaxations, layout, true));
            }
        }
    }
}

fn finish(
    inputs: PlannerInputs,
    relaxations: Vec<Relaxation>,
    layout: FixedLayout,
    fallback: bool,
) -> Feasibility {
    let capacity = free_capacity(&inputs, &layout.points);
    let free_meals = inputs.meals_target.saturating_sub(layout.points.len());
    Feasibility {
        inputs,
        relaxations,
        fixed_points: layout.points,
        issues: layout.issues,
        free_meals,
        free_capacity: capacity,
        fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, DailyTotals, WorkoutWindow};

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn training(meals: usize) -> PlannerInputs {
        let mut inputs = PlannerInputs::new(
            t("07:00"),
            t("23:00"),
            DailyTotals::new(2000.0, 150.0, 220.0, 60.0),
        )
        .with_workout(Some(WorkoutWindow {
            start: t("17:00"),
            end: t("18:00"),
        }));
        inputs.meals_target = meals;
        inputs
    }

    #[test]
    fn test_no_change_when_already_feasible() {
        let inputs = training(6);
        let result = ensure_feasible(&inputs).unwrap();
        assert!(result.relaxations.is_empty());
        assert!(!result.fallback);
        assert_eq!(result.free_meals, 2);
        assert!(result.is_placeable());
        assert!(result.inputs.anchor.is_some());
    }

    #[test]
    fn test_post_workout_dropped_first() {
        let result = ensure_feasible(&training(4)).unwrap();
        assert_eq!(
            result.relaxations,
            vec![Relaxation {
                anchor: AnchorKind::PostWorkout,
                reason: RelaxReason::TooFewSlots,
            }]
        );
        assert!(!result.inputs.include_post_meal);
        assert!(result.inputs.include_pre_meal);
        assert!(result.inputs.include_pre_sleep);
    }

    #[test]
    fn test_drop_order_down_to_breakfast() {
        let result = ensure_feasible(&training(2)).unwrap();
        let dropped: Vec<AnchorKind> = result.relaxations.iter().map(|r| r.anchor).collect();
        assert_eq!(
            dropped,
            vec![
                AnchorKind::PostWorkout,
                AnchorKind::PreSleep,
                AnchorKind::PreWorkout
            ]
        );
        assert_eq!(result.fixed_points.len(), 1);
        assert_eq!(result.free_meals, 1);
        assert!(!result.fallback);
    }

    #[test]
    fn test_single_meal_falls_back_to_breakfast_only() {
        let result = ensure_feasible(&training(1)).unwrap();
        assert!(result.fallback);
        assert_eq!(result.free_meals, 0);
        assert!(result.is_placeable());
        assert_eq!(result.inputs.meals_target, 1);
    }

    #[test]
    fn test_missing_workout_window_disables_workout_anchors() {
        let mut inputs = training(5);
        inputs.workout = None;
        let result = ensure_feasible(&inputs).unwrap();
        assert!(!result.inputs.include_pre_meal);
        assert!(!result.inputs.include_post_meal);
        assert!(
            result
                .relaxations
                .iter()
                .all(|r| r.reason == RelaxReason::NoWorkoutWindow)
        );
        assert_eq!(result.relaxations.len(), 2);
    }

    #[test]
    fn test_conflict_drops_involved_anchor() {
        // 08:00 workout: the pre-workout window closes before the eating window opens.
        let mut inputs = training(5);
        inputs.workout = Some(WorkoutWindow {
            start: t("08:00"),
            end: t("09:00"),
        });
        let result = ensure_feasible(&inputs).unwrap();
        assert!(
            result
                .relaxations
                .iter()
                .any(|r| r.anchor == AnchorKind::PreWorkout && r.reason == RelaxReason::AnchorConflict)
        );
        assert!(result.inputs.include_post_meal);
        assert!(result.is_placeable());
    }

    #[test]
    fn test_idempotent() {
        for meals in 1..=8 {
            let once = ensure_feasible(&training(meals)).unwrap();
            let twice = ensure_feasible(&once.inputs).unwrap();
            assert_eq!(once.inputs, twice.inputs);
            assert!(twice.relaxations.is_empty());
        }
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let mut inputs = training(4);
        inputs.wake = t("23:30");
        assert!(ensure_feasible(&inputs).is_err());
    }
}
