use meal_slot_planner::models::{AnchorKind, ClockTime, DailyTotals, PlannerInputs, WorkoutWindow};
use meal_slot_planner::planner::{RelaxReason, Relaxation};
use meal_slot_planner::{compute_plan, ensure_feasible};

fn t(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn training_day(meals: usize, workout: &str) -> PlannerInputs {
    let mut inputs = PlannerInputs::new(
        t("07:00"),
        t("23:00"),
        DailyTotals::new(2000.0, 150.0, 220.0, 60.0),
    )
    .with_workout(Some(workout.parse::<WorkoutWindow>().unwrap()));
    inputs.meals_target = meals;
    inputs
}

#[test]
fn test_two_meal_training_day_drops_post_workout() {
    let inputs = training_day(2, "17:00-18:00");
    assert!(inputs.include_post_meal);

    let result = ensure_feasible(&inputs).unwrap();
    assert!(!result.inputs.include_post_meal);
    assert_eq!(result.inputs.meals_target, 2);
    assert_eq!(
        result.relaxations[0],
        Relaxation {
            anchor: AnchorKind::PostWorkout,
            reason: RelaxReason::TooFewSlots,
        }
    );
    assert!(result.is_placeable());

    let plan = compute_plan(&inputs).unwrap();
    assert_eq!(plan.len(), 2);
    assert!(!plan.inputs.include_post_meal);
}

#[test]
fn test_repair_is_idempotent() {
    let workouts = ["07:00-08:00", "08:00-09:00", "12:00-13:00", "17:00-18:00", "20:00-21:00"];
    for workout in workouts {
        for meals in 1..=8 {
            let once = ensure_feasible(&training_day(meals, workout)).unwrap();
            let twice = ensure_feasible(&once.inputs).unwrap();
            assert_eq!(once.inputs, twice.inputs, "{} / {} meals", workout, meals);
            assert!(twice.relaxations.is_empty(), "{} / {} meals", workout, meals);
        }
    }
}

#[test]
fn test_seven_meals_take_relaxation_path() {
    // Four anchors leave three free meals, but only two fit at a 120 min gap.
    let inputs = training_day(7, "17:00-18:00");
    let result = ensure_feasible(&inputs).unwrap();

    assert_eq!(
        result.relaxations,
        vec![Relaxation {
            anchor: AnchorKind::PostWorkout,
            reason: RelaxReason::NoRoomForFreeMeals,
        }]
    );
    assert!(!result.fallback);
    assert_eq!(result.fixed_points.len(), 3);
    assert_eq!(result.free_meals, 4);

    let plan = compute_plan(&inputs).unwrap();
    let times: Vec<String> = plan.slots.iter().map(|s| s.time.to_string()).collect();
    assert_eq!(
        times,
        vec!["07:45", "10:20", "12:55", "15:30", "17:35", "19:40", "21:45"]
    );
}

#[test]
fn test_training_day_without_workout_window() {
    let mut inputs = training_day(5, "17:00-18:00");
    inputs.workout = None;

    let result = ensure_feasible(&inputs).unwrap();
    let reasons: Vec<RelaxReason> = result.relaxations.iter().map(|r| r.reason).collect();
    assert_eq!(
        reasons,
        vec![RelaxReason::NoWorkoutWindow, RelaxReason::NoWorkoutWindow]
    );
    assert!(result.fixed_points.iter().all(|p| !p.anchor.is_workout()));

    let plan = compute_plan(&inputs).unwrap();
    assert_eq!(plan.len(), 5);
    assert!(plan.inputs.training_day);
}

#[test]
fn test_never_reduces_meal_count() {
    for meals in 1..=8 {
        let result = ensure_feasible(&training_day(meals, "12:00-13:00")).unwrap();
        assert_eq!(result.inputs.meals_target, meals);
    }
}

#[test]
fn test_omitted_anchor_is_materialized() {
    let inputs = training_day(6, "17:00-18:00");
    assert!(inputs.anchor.is_none());
    let result = ensure_feasible(&inputs).unwrap();
    assert_eq!(result.inputs.anchor, Some(Default::default()));
}
