//! Registry of macro/energy weighting curves.
//!
//! Each preset is a pure function from a slot's context to non-negative
//! weights. The allocator normalizes them per channel, so only ratios matter.

use strsim::jaro_winkler;

use crate::error::{PlanError, Result};
use crate::models::{Nutrient, Preset, SlotKind, SlotRole};
use crate::planner::constants::*;

/// Where a slot sits in the day, as seen by a weighting curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotContext {
    pub index: usize,
    pub count: usize,
    pub role: SlotRole,
    pub kind: SlotKind,
    pub training_day: bool,
}

impl SlotContext {
    /// 0.0 for the first slot, 1.0 for the last.
    pub fn position(&self) -> f64 {
        if self.count <= 1 {
            0.0
        } else {
            self.index as f64 / (self.count - 1) as f64
        }
    }
}

/// Relative weights for one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotWeights {
    pub energy: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl SlotWeights {
    pub fn uniform(weight: f64) -> Self {
        Self {
            energy: weight,
            protein: weight,
            carbs: weight,
            fat: weight,
        }
    }

    pub fn nutrient(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
        }
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            energy: self.energy * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }
}

pub type WeightFn = fn(&SlotContext) -> SlotWeights;

pub struct PresetEntry {
    pub preset: Preset,
    pub name: &'static str,
    pub description: &'static str,
    pub weigh: WeightFn,
}

static STANDARD: PresetEntry = PresetEntry {
    preset: Preset::Standard,
    name: "standard",
    description: "Even split, with carbs pushed around the workout on training days",
    weigh: standard,
};

static AM_CARBS: PresetEntry = PresetEntry {
    preset: Preset::AmCarbs,
    name: "amCarbs",
    description: "Carbs weighted toward the morning, fat toward the evening",
    weigh: am_carbs,
};

static PM_CARBS: PresetEntry = PresetEntry {
    preset: Preset::PmCarbs,
    name: "pmCarbs",
    description: "Carbs weighted toward the evening, fat toward the morning",
    weigh: pm_carbs,
};

static BACKLOAD: PresetEntry = PresetEntry {
    preset: Preset::Backload,
    name: "backload",
    description: "Energy and macros ramp up toward later slots",
    weigh: backload,
};

static REST_EVEN: PresetEntry = PresetEntry {
    preset: Preset::RestEven,
    name: "restEven",
    description: "Rest day, even split with no workout adjustments",
    weigh: rest_even,
};

static REST_AM: PresetEntry = PresetEntry {
    preset: Preset::RestAm,
    name: "restAM",
    description: "Rest day, front-loaded toward the morning",
    weigh: rest_am,
};

/// All registered presets, in display order.
pub static PRESETS: [&PresetEntry; 6] = [
    &STANDARD, &AM_CARBS, &PM_CARBS, &BACKLOAD, &REST_EVEN, &REST_AM,
];

pub fn entry(preset: Preset) -> &'static PresetEntry {
    match preset {
        Preset::Standard => &STANDARD,
        Preset::AmCarbs => &AM_CARBS,
        Preset::PmCarbs => &PM_CARBS,
        Preset::Backload => &BACKLOAD,
        Preset::RestEven => &REST_EVEN,
        Preset::RestAm => &REST_AM,
    }
}

/// Find a preset by name (case-insensitive).
///
/// Unknown names fail with the closest registered name as a suggestion.
pub fn lookup(name: &str) -> Result<&'static PresetEntry> {
    let wanted = name.trim().to_lowercase();
    if let Some(found) = PRESETS.iter().find(|e| e.name.to_lowercase() == wanted) {
        return Ok(*found);
    }

    let suggestion = PRESETS
        .iter()
        .map(|e| (e.name, jaro_winkler(&e.name.to_lowercase(), &wanted)))
        .filter(|(_, score)| *score > PRESET_SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1));

    let known: Vec<&str> = PRESETS.iter().map(|e| e.name).collect();
    Err(PlanError::InvalidInput(match suggestion {
        Some((close, _)) => format!("unknown preset '{}', did you mean '{}'?", name, close),
        None => format!(
            "unknown preset '{}', expected one of: {}",
            name,
            known.join(", ")
        ),
    }))
}

/// Weights for one slot, including the snack discount.
pub fn weigh(preset: Preset, ctx: &SlotContext) -> SlotWeights {
    let weights = (entry(preset).weigh)(ctx);
    match ctx.kind {
        SlotKind::Snack => weights.scaled(SNACK_WEIGHT),
        SlotKind::Meal => weights,
    }
}

fn lerp(first: f64, last: f64, position: f64) -> f64 {
    first + (last - first) * position
}

/// Carb/fat shifts for the slots bracketing a workout.
fn peri_workout(ctx: &SlotContext, mut w: SlotWeights) -> SlotWeights {
    if !ctx.training_day {
        return w;
    }
    match ctx.role {
        SlotRole::PreWorkout => {
            w.carbs *= PRE_WORKOUT_CARB_BOOST;
            w.fat *= PERI_WORKOUT_FAT_FACTOR;
        }
        SlotRole::PostWorkout => {
            w.carbs *= POST_WORKOUT_CARB_BOOST;
            w.protein *= POST_WORKOUT_PROTEIN_BOOST;
            w.fat *= PERI_WORKOUT_FAT_FACTOR;
        }
        _ => {}
    }
    w
}

fn standard(ctx: &SlotContext) -> SlotWeights {
    peri_workout(ctx, SlotWeights::uniform(1.0))
}

fn carb_tilt(ctx: &SlotContext, toward_morning: bool) -> SlotWeights {
    let p = ctx.position();
    let p = if toward_morning { p } else { 1.0 - p };
    let tilt = CARB_TILT * (1.0 - 2.0 * p);
    let w = SlotWeights {
        energy: 1.0,
        protein: 1.0,
        carbs: 1.0 + tilt,
        fat: 1.0 - FAT_COUNTER_TILT * tilt,
    };
    peri_workout(ctx, w)
}

fn am_carbs(ctx: &SlotContext) -> SlotWeights {
    carb_tilt(ctx, true)
}

fn pm_carbs(ctx: &SlotContext) -> SlotWeights {
    carb_tilt(ctx, false)
}

fn backload(ctx: &SlotContext) -> SlotWeights {
    let w = lerp(BACKLOAD_FIRST, BACKLOAD_LAST, ctx.position());
    peri_workout(ctx, SlotWeights::uniform(w))
}

fn rest_even(_ctx: &SlotContext) -> SlotWeights {
    SlotWeights::uniform(1.0)
}

fn rest_am(ctx: &SlotContext) -> SlotWeights {
    SlotWeights::uniform(lerp(REST_AM_FIRST, REST_AM_LAST, ctx.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;

    fn ctx(index: usize, count: usize) -> SlotContext {
        SlotContext {
            index,
            count,
            role: SlotRole::Free,
            kind: SlotKind::Meal,
            training_day: false,
        }
    }

    #[test]
    fn test_position_spans_zero_to_one() {
        assert_float_absolute_eq!(ctx(0, 5).position(), 0.0, 1e-9);
        assert_float_absolute_eq!(ctx(2, 5).position(), 0.5, 1e-9);
        assert_float_absolute_eq!(ctx(4, 5).position(), 1.0, 1e-9);
        assert_float_absolute_eq!(ctx(0, 1).position(), 0.0, 1e-9);
    }

    #[test]
    fn test_all_weights_positive() {
        for preset in Preset::ALL {
            for count in 1..=MAX_MEALS {
                for index in 0..count {
                    for role in [SlotRole::Free, SlotRole::PreWorkout, SlotRole::PostWorkout] {
                        let c = SlotContext {
                            role,
                            training_day: true,
                            ..ctx(index, count)
                        };
                        let w = weigh(preset, &c);
                        assert!(w.energy > 0.0 && w.protein > 0.0 && w.carbs > 0.0 && w.fat > 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_am_carbs_tilts_morning() {
        let first = weigh(Preset::AmCarbs, &ctx(0, 4));
        let last = weigh(Preset::AmCarbs, &ctx(3, 4));
        assert_float_absolute_eq!(first.carbs, 1.0 + CARB_TILT, 1e-9);
        assert_float_absolute_eq!(last.carbs, 1.0 - CARB_TILT, 1e-9);
        assert!(first.fat < last.fat);
        assert_float_absolute_eq!(first.nutrient(Nutrient::Carbs), first.carbs, 1e-12);
        assert_float_absolute_eq!(last.nutrient(Nutrient::Fat), last.fat, 1e-12);
    }

    #[test]
    fn test_pm_carbs_mirrors_am_carbs() {
        let am = weigh(Preset::AmCarbs, &ctx(0, 5));
        let pm = weigh(Preset::PmCarbs, &ctx(4, 5));
        assert_float_absolute_eq!(am.carbs, pm.carbs, 1e-9);
        assert_float_absolute_eq!(am.fat, pm.fat, 1e-9);
    }

    #[test]
    fn test_backload_ramps_up() {
        let first = weigh(Preset::Backload, &ctx(0, 3));
        let last = weigh(Preset::Backload, &ctx(2, 3));
        assert_float_absolute_eq!(first.energy, BACKLOAD_FIRST, 1e-9);
        assert_float_absolute_eq!(last.energy, BACKLOAD_LAST, 1e-9);
    }

    #[test]
    fn test_snack_discount() {
        let snack = SlotContext {
            kind: SlotKind::Snack,
            ..ctx(1, 3)
        };
        let w = weigh(Preset::Standard, &snack);
        assert_float_absolute_eq!(w.energy, SNACK_WEIGHT, 1e-9);
    }

    #[test]
    fn test_post_workout_boost_only_on_training_day() {
        let rest = SlotContext {
            role: SlotRole::PostWorkout,
            ..ctx(2, 4)
        };
        let training = SlotContext {
            training_day: true,
            ..rest
        };
        assert_float_absolute_eq!(weigh(Preset::Standard, &rest).carbs, 1.0, 1e-9);
        assert_float_absolute_eq!(
            weigh(Preset::Standard, &training).carbs,
            POST_WORKOUT_CARB_BOOST,
            1e-9
        );
        // Rest presets ignore the workout role entirely.
        assert_float_absolute_eq!(weigh(Preset::RestEven, &training).carbs, 1.0, 1e-9);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(lookup("restAM").unwrap().preset, Preset::RestAm);
        assert_eq!(lookup("RESTAM").unwrap().preset, Preset::RestAm);
        assert_eq!(lookup(" backload ").unwrap().preset, Preset::Backload);
    }

    #[test]
    fn test_lookup_suggests_close_name() {
        let err = lookup("amcarb").err().unwrap().to_string();
        assert!(err.contains("did you mean 'amCarbs'"), "{}", err);

        let err = lookup("zzz").err().unwrap().to_string();
        assert!(err.contains("expected one of"), "{}", err);
    }

    #[test]
    fn test_registry_matches_enum() {
        for preset in Preset::ALL {
            assert_eq!(entry(preset).preset, preset);
            assert_eq!(lookup(entry(preset).name).unwrap().preset, preset);
        }
    }
}
