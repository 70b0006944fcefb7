use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{ClockTime, DailyTotals, MINUTES_PER_DAY, PlannerInputs, Preset, WorkoutWindow};
use crate::planner::constants::MAX_MEALS;

/// Min/max ranges the sweep draws planner inputs from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRanges {
    /// (earliest, latest) wake minute
    pub wake: (u32, u32),
    /// (min, max) minutes awake
    pub awake: (u32, u32),
    pub meals: (usize, usize),
    pub min_gap: (u32, u32),
    /// Extra minutes added to the min gap to get the target gap
    pub target_slack: (u32, u32),
    /// (min, max) workout length in minutes
    pub workout_len: (u32, u32),
    pub energy: (f64, f64),
    pub protein: (f64, f64),
    pub carbs: (f64, f64),
    pub fat: (f64, f64),
    pub training_probability: f64,
    /// Chance each optional anchor flag stays on
    pub include_probability: f64,
}

impl Default for SampleRanges {
    fn default() -> Self {
        Self {
            wake: (4 * 60, 10 * 60),
            awake: (12 * 60, 19 * 60),
            meals: (1, MAX_MEALS),
            min_gap: (60, 180),
            target_slack: (0, 120),
            workout_len: (30, 150),
            energy: (1200.0, 4000.0),
            protein: (60.0, 260.0),
            carbs: (50.0, 500.0),
            fat: (30.0, 150.0),
            training_probability: 0.5,
            include_probability: 0.8,
        }
    }
}

/// Draw one set of well-formed planner inputs.
///
/// Workouts always fall inside the waking window, so every sample passes
/// input validation; anything the planner rejects is a real finding.
pub fn random_inputs(rng: &mut impl Rng, ranges: &SampleRanges) -> PlannerInputs {
    let wake = rng.gen_range(ranges.wake.0..=ranges.wake.1);
    let sleep = (wake + rng.gen_range(ranges.awake.0..=ranges.awake.1)).min(MINUTES_PER_DAY - 1);

    let totals = DailyTotals::new(
        round1(rng.gen_range(ranges.energy.0..=ranges.energy.1)),
        round1(rng.gen_range(ranges.protein.0..=ranges.protein.1)),
        round1(rng.gen_range(ranges.carbs.0..=ranges.carbs.1)),
        round1(rng.gen_range(ranges.fat.0..=ranges.fat.1)),
    );

    let mut inputs = PlannerInputs::new(ClockTime::at(wake), ClockTime::at(sleep), totals);
    inputs.meals_target = rng.gen_range(ranges.meals.0..=ranges.meals.1);
    inputs.min_gap_min = rng.gen_range(ranges.min_gap.0..=ranges.min_gap.1);
    inputs.target_gap_min =
        inputs.min_gap_min + rng.gen_range(ranges.target_slack.0..=ranges.target_slack.1);
    inputs.preset = Preset::ALL[rng.gen_range(0..Preset::ALL.len())];
    inputs.include_pre_meal = rng.gen_bool(ranges.include_probability);
    inputs.include_post_meal = rng.gen_bool(ranges.include_probability);
    inputs.include_pre_sleep = rng.gen_bool(ranges.include_probability);

    if rng.gen_bool(ranges.training_probability) {
        let len = rng.gen_range(ranges.workout_len.0..=ranges.workout_len.1);
        let workout = (sleep > wake + len).then(|| {
            let start = rng.gen_range(wake..=sleep - len);
            WorkoutWindow {
                start: ClockTime::at(start),
                end: ClockTime::at(start + len),
            }
        });
        inputs = inputs.with_workout(workout);
    }
    inputs
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
