use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::{AnchorConfig, AnchorKind, ClockTime};
use crate::planner::constants::{
    DEFAULT_MEALS_TARGET, DEFAULT_MIN_GAP_MIN, DEFAULT_TARGET_GAP_MIN, MAX_MEALS,
};
use crate::planner::presets;

/// The three macronutrients tracked per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Protein,
    Carbs,
    Fat,
}

impl Nutrient {
    pub const ALL: [Nutrient; 3] = [Nutrient::Protein, Nutrient::Carbs, Nutrient::Fat];
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Nutrient::Protein => "protein",
            Nutrient::Carbs => "carbs",
            Nutrient::Fat => "fat",
        })
    }
}

/// Daily energy and macro totals to spread across the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub energy_kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl DailyTotals {
    pub fn new(energy_kcal: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            energy_kcal,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    pub fn grams(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Protein => self.protein_g,
            Nutrient::Carbs => self.carbs_g,
            Nutrient::Fat => self.fat_g,
        }
    }

    /// Integer gram target the plan must hit exactly.
    pub fn grams_target(&self, nutrient: Nutrient) -> u32 {
        self.grams(nutrient).round() as u32
    }

    /// Integer kcal target the plan must hit within tolerance.
    pub fn energy_target(&self) -> u32 {
        self.energy_kcal.round() as u32
    }

    /// Rejects negative or non-finite totals, and totals too large to
    /// carry as whole kcal or grams.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("energy", self.energy_kcal),
            ("protein", self.protein_g),
            ("carbs", self.carbs_g),
            ("fat", self.fat_g),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::InvalidInput(format!(
                    "{} total must be a non-negative number, got {}",
                    name, value
                )));
            }
            if value.round() > f64::from(u32::MAX) {
                return Err(PlanError::InvalidInput(format!(
                    "{} total {} is too large",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// A training session's start and end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl FromStr for WorkoutWindow {
    type Err = PlanError;

    /// Parses `HH:MM-HH:MM`.
    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            PlanError::InvalidInput(format!("workout window '{}' must look like 17:00-18:00", s))
        })?;
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}

/// Named macro/energy weighting strategies. See `planner::presets` for the curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Preset {
    #[default]
    Standard,
    AmCarbs,
    PmCarbs,
    Backload,
    RestEven,
    RestAm,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Standard,
        Preset::AmCarbs,
        Preset::PmCarbs,
        Preset::Backload,
        Preset::RestEven,
        Preset::RestAm,
    ];

    pub fn name(self) -> &'static str {
        presets::entry(self).name
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        presets::lookup(s).map(|entry| entry.preset)
    }
}

impl TryFrom<String> for Preset {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Preset> for String {
    fn from(preset: Preset) -> Self {
        preset.name().to_string()
    }
}

fn default_meals_target() -> usize {
    DEFAULT_MEALS_TARGET
}

fn default_min_gap() -> u32 {
    DEFAULT_MIN_GAP_MIN
}

fn default_target_gap() -> u32 {
    DEFAULT_TARGET_GAP_MIN
}

fn default_true() -> bool {
    true
}

/// Everything one plan computation needs.
///
/// `anchor` may be omitted; the default anchor table is used in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerInputs {
    pub wake: ClockTime,
    pub sleep: ClockTime,
    #[serde(default)]
    pub training_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout: Option<WorkoutWindow>,
    #[serde(default = "default_meals_target")]
    pub meals_target: usize,
    #[serde(default = "default_min_gap")]
    pub min_gap_min: u32,
    #[serde(default = "default_target_gap")]
    pub target_gap_min: u32,
    pub totals: DailyTotals,
    #[serde(default)]
    pub preset: Preset,
    #[serde(default = "default_true")]
    pub include_pre_meal: bool,
    #[serde(default = "default_true")]
    pub include_post_meal: bool,
    #[serde(default = "default_true")]
    pub include_pre_sleep: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorConfig>,
}

impl PlannerInputs {
    /// Rest-day inputs with default gaps, meal count, preset and anchors.
    pub fn new(wake: ClockTime, sleep: ClockTime, totals: DailyTotals) -> Self {
        Self {
            wake,
            sleep,
            training_day: false,
            workout: None,
            meals_target: DEFAULT_MEALS_TARGET,
            min_gap_min: DEFAULT_MIN_GAP_MIN,
            target_gap_min: DEFAULT_TARGET_GAP_MIN,
            totals,
            preset: Preset::default(),
            include_pre_meal: true,
            include_post_meal: true,
            include_pre_sleep: true,
            anchor: None,
        }
    }

    /// Mark as a training day with the given session.
    pub fn with_workout(mut self, workout: Option<WorkoutWindow>) -> Self {
        self.training_day = true;
        self.workout = workout;
        self
    }

    /// Anchor config with defaults filled in when none was supplied.
    pub fn anchors(&self) -> AnchorConfig {
        self.anchor.clone().unwrap_or_default()
    }

    /// Copy with `anchor` materialized from defaults.
    pub fn with_default_anchors(&self) -> Self {
        Self {
            anchor: Some(self.anchors()),
            ..self.clone()
        }
    }

    /// Whether an anchor is switched on by the inputs.
    ///
    /// Workout anchors only count on training days.
    pub fn includes(&self, kind: AnchorKind) -> bool {
        match kind {
            AnchorKind::Breakfast => true,
            AnchorKind::PreWorkout => self.training_day && self.include_pre_meal,
            AnchorKind::PostWorkout => self.training_day && self.include_post_meal,
            AnchorKind::PreSleep => self.include_pre_sleep,
        }
    }

    /// Switch an optional anchor off. Breakfast cannot be disabled.
    pub(crate) fn disable(&mut self, kind: AnchorKind) {
        match kind {
            AnchorKind::Breakfast => {}
            AnchorKind::PreWorkout => self.include_pre_meal = false,
            AnchorKind::PostWorkout => self.include_post_meal = false,
            AnchorKind::PreSleep => self.include_pre_sleep = false,
        }
    }

    /// Earliest and latest minute a meal may be placed at.
    ///
    /// Nothing is eaten before the breakfast window opens or after the
    /// pre-sleep cutoff.
    pub fn eating_window(&self) -> (u32, u32) {
        let anchors = self.anchors();
        let earliest = self.wake.minutes() + anchors.breakfast.min();
        let latest = self
            .sleep
            .minutes()
            .saturating_sub(anchors.pre_sleep.min());
        (earliest, latest)
    }

    /// Reject malformed inputs before any placement is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.wake >= self.sleep {
            return Err(PlanError::InvalidInput(format!(
                "wake time {} must be before sleep time {}",
                self.wake, self.sleep
            )));
        }
        if self.meals_target == 0 || self.meals_target > MAX_MEALS {
            return Err(PlanError::InvalidInput(format!(
                "meal count must be between 1 and {}, got {}",
                MAX_MEALS, self.meals_target
            )));
        }
        if self.min_gap_min == 0 {
            return Err(PlanError::InvalidInput(
                "minimum gap between meals must be at least 1 minute".to_string(),
            ));
        }
        if self.target_gap_min < self.min_gap_min {
            return Err(PlanError::InvalidInput(format!(
                "target gap {} min is below the minimum gap {} min",
                self.target_gap_min, self.min_gap_min
            )));
        }
        self.totals.validate()?;

        if let Some(workout) = self.workout {
            if workout.start >= workout.end {
                return Err(PlanError::InvalidInput(format!(
                    "workout start {} must be before its end {}",
                    workout.start, workout.end
                )));
            }
            if workout.start < self.wake || workout.end > self.sleep {
                return Err(PlanError::InvalidInput(format!(
                    "workout {}-{} falls outside the waking window {}-{}",
                    workout.start, workout.end, self.wake, self.sleep
                )));
            }
        }

        let (earliest, latest) = self.eating_window();
        if earliest > latest {
            return Err(PlanError::InvalidInput(format!(
                "waking window {}-{} is too short for the breakfast and pre-sleep offsets",
                self.wake, self.sleep
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn sample() -> PlannerInputs {
        PlannerInputs::new(
            t("07:00"),
            t("23:00"),
            DailyTotals::new(2000.0, 150.0, 220.0, 60.0),
        )
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wake_after_sleep() {
        let mut inputs = sample();
        inputs.sleep = t("06:00");
        assert!(matches!(inputs.validate(), Err(PlanError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_meal_count_bounds() {
        let mut inputs = sample();
        inputs.meals_target = 0;
        assert!(inputs.validate().is_err());
        inputs.meals_target = MAX_MEALS + 1;
        assert!(inputs.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_totals() {
        let mut inputs = sample();
        inputs.totals.fat_g = -1.0;
        assert!(inputs.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_totals_past_u32() {
        let mut inputs = sample();
        inputs.totals.energy_kcal = 5.0e9;
        let err = inputs.validate().unwrap_err();
        assert!(err.to_string().contains("energy"), "{}", err);

        inputs.totals.energy_kcal = f64::from(u32::MAX);
        assert!(inputs.validate().is_ok());
        assert_eq!(inputs.totals.energy_target(), u32::MAX);

        inputs.totals.carbs_g = f64::from(u32::MAX) + 1.0;
        assert!(inputs.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_workout_outside_day() {
        let inputs = sample().with_workout(Some(WorkoutWindow {
            start: t("05:00"),
            end: t("06:00"),
        }));
        assert!(inputs.validate().is_err());
    }

    #[test]
    fn test_workout_anchors_ignored_on_rest_day() {
        let inputs = sample();
        assert!(inputs.includes(AnchorKind::Breakfast));
        assert!(!inputs.includes(AnchorKind::PreWorkout));
        assert!(!inputs.includes(AnchorKind::PostWorkout));
        assert!(inputs.includes(AnchorKind::PreSleep));
    }

    #[test]
    fn test_eating_window_uses_anchor_offsets() {
        let (earliest, latest) = sample().eating_window();
        assert_eq!(earliest, 7 * 60 + 30);
        assert_eq!(latest, 22 * 60);
    }

    #[test]
    fn test_minimal_json_takes_defaults() {
        let json = r#"{
            "wake": "07:00",
            "sleep": "23:00",
            "totals": {"energyKcal": 2000, "proteinG": 150, "carbsG": 220, "fatG": 60}
        }"#;
        let inputs: PlannerInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.meals_target, DEFAULT_MEALS_TARGET);
        assert_eq!(inputs.preset, Preset::Standard);
        assert!(inputs.include_post_meal);
        assert!(inputs.anchor.is_none());
    }

    #[test]
    fn test_preset_serde_names() {
        let json = serde_json::to_string(&Preset::RestAm).unwrap();
        assert_eq!(json, "\"restAM\"");
        let back: Preset = serde_json::from_str("\"amCarbs\"").unwrap();
        assert_eq!(back, Preset::AmCarbs);
        assert!(serde_json::from_str::<Preset>("\"keto\"").is_err());
    }

    #[test]
    fn test_workout_window_parse() {
        let w: WorkoutWindow = "17:00-18:15".parse().unwrap();
        assert_eq!(w.start, t("17:00"));
        assert_eq!(w.end, t("18:15"));
        assert!("17:00".parse::<WorkoutWindow>().is_err());
    }
}
