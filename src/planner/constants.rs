/// Upper bound on meals per day.
pub const MAX_MEALS: usize = 8;

/// Default number of meals when a request does not say.
pub const DEFAULT_MEALS_TARGET: usize = 4;

/// Hard floor between two consecutive meals, in minutes.
pub const DEFAULT_MIN_GAP_MIN: u32 = 120;

/// Preferred spacing between meals, in minutes.
pub const DEFAULT_TARGET_GAP_MIN: u32 = 180;

/// Allowed absolute difference between summed slot kcal and the daily target.
pub const ENERGY_TOLERANCE_KCAL: u32 = 1;

// ─────────────────────────────────────────────────────────────────────────────
// Weighting curve shape
// ─────────────────────────────────────────────────────────────────────────────

/// Relative size of a snack slot compared to a full meal.
pub const SNACK_WEIGHT: f64 = 0.5;

/// How far the carb-timing presets tilt carbs from one end of the day to the
/// other (first slot gets 1 + tilt, last gets 1 - tilt).
pub const CARB_TILT: f64 = 0.5;

/// Fat moves opposite to carbs in the carb-timing presets, at this fraction
/// of the carb tilt.
pub const FAT_COUNTER_TILT: f64 = 0.5;

/// Backload preset: first slot weight and last slot weight.
pub const BACKLOAD_FIRST: f64 = 0.6;
pub const BACKLOAD_LAST: f64 = 1.4;

/// Rest-day AM preset: first slot weight and last slot weight.
pub const REST_AM_FIRST: f64 = 1.4;
pub const REST_AM_LAST: f64 = 0.7;

/// Carb multiplier for the slots bracketing a workout on training-day presets.
pub const PRE_WORKOUT_CARB_BOOST: f64 = 1.25;
pub const POST_WORKOUT_CARB_BOOST: f64 = 1.5;

/// Fat multiplier around workouts (slower digestion).
pub const PERI_WORKOUT_FAT_FACTOR: f64 = 0.5;

/// Protein multiplier for the post-workout slot.
pub const POST_WORKOUT_PROTEIN_BOOST: f64 = 1.2;

/// Jaro-Winkler score above which an unknown preset name gets a suggestion.
pub const PRESET_SUGGESTION_THRESHOLD: f64 = 0.7;
