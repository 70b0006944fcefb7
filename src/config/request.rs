use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::{
    AnchorConfig, AnchorOverrides, ClockTime, DailyTotals, PlannerInputs, Preset, WorkoutWindow,
};

/// Daily totals where any field may be left for a lower layer to fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialTotals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_kcal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
}

impl PartialTotals {
    fn layered(&self, top: &PartialTotals) -> Self {
        Self {
            energy_kcal: top.energy_kcal.or(self.energy_kcal),
            protein_g: top.protein_g.or(self.protein_g),
            carbs_g: top.carbs_g.or(self.carbs_g),
            fat_g: top.fat_g.or(self.fat_g),
        }
    }

    fn resolve(&self) -> Result<DailyTotals> {
        let field = |value: Option<f64>, name: &str| {
            value.ok_or_else(|| PlanError::InvalidInput(format!("missing daily {} total", name)))
        };
        Ok(DailyTotals::new(
            field(self.energy_kcal, "energy")?,
            field(self.protein_g, "protein")?,
            field(self.carbs_g, "carbs")?,
            field(self.fat_g, "fat")?,
        ))
    }
}

impl From<DailyTotals> for PartialTotals {
    fn from(t: DailyTotals) -> Self {
        Self {
            energy_kcal: Some(t.energy_kcal),
            protein_g: Some(t.protein_g),
            carbs_g: Some(t.carbs_g),
            fat_g: Some(t.fat_g),
        }
    }
}

/// A planning request where every field is optional.
///
/// Config files, request files, prompts and CLI flags each produce one of
/// these; they are layered and then resolved into `PlannerInputs` once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout: Option<WorkoutWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meals_target: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_gap_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_gap_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<PartialTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_pre_meal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_post_meal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_pre_sleep: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorOverrides>,
}

impl PlanRequest {
    /// Layer `top` over `self`; every field set in `top` wins.
    ///
    /// Totals and anchor overrides merge field by field.
    pub fn layered(&self, top: &PlanRequest) -> Self {
        let totals = match (&self.totals, &top.totals) {
            (Some(low), Some(high)) => Some(low.layered(high)),
            _ => top.totals.or(self.totals),
        };
        let anchor = match (&self.anchor, &top.anchor) {
            (Some(low), Some(high)) => Some(low.layered(high)),
            _ => top.anchor.clone().or_else(|| self.anchor.clone()),
        };
        Self {
            wake: top.wake.or(self.wake),
            sleep: top.sleep.or(self.sleep),
            training_day: top.training_day.or(self.training_day),
            workout: top.workout.or(self.workout),
            meals_target: top.meals_target.or(self.meals_target),
            min_gap_min: top.min_gap_min.or(self.min_gap_min),
            target_gap_min: top.target_gap_min.or(self.target_gap_min),
            totals,
            preset: top.preset.or(self.preset),
            include_pre_meal: top.include_pre_meal.or(self.include_pre_meal),
            include_post_meal: top.include_post_meal.or(self.include_post_meal),
            include_pre_sleep: top.include_pre_sleep.or(self.include_pre_sleep),
            anchor,
        }
    }

    /// Fill gaps with built-in defaults and produce concrete inputs.
    ///
    /// Wake, sleep and all four totals are required. A workout window
    /// implies a training day unless `trainingDay` says otherwise.
    /// The result is not validated; the planner does that.
    pub fn resolve(&self) -> Result<PlannerInputs> {
        let wake = self
            .wake
            .ok_or_else(|| PlanError::InvalidInput("missing wake time".to_string()))?;
        let sleep = self
            .sleep
            .ok_or_else(|| PlanError::InvalidInput("missing sleep time".to_string()))?;
        let totals = self.totals.unwrap_or_default().resolve()?;

        let mut inputs = PlannerInputs::new(wake, sleep, totals);
        inputs.workout = self.workout;
        inputs.training_day = self.training_day.unwrap_or(self.workout.is_some());
        if let Some(n) = self.meals_target {
            inputs.meals_target = n;
        }
        if let Some(gap) = self.min_gap_min {
            inputs.min_gap_min = gap;
        }
        if let Some(gap) = self.target_gap_min {
            inputs.target_gap_min = gap;
        }
        if let Some(preset) = self.preset {
            inputs.preset = preset;
        }
        if let Some(flag) = self.include_pre_meal {
            inputs.include_pre_meal = flag;
        }
        if let Some(flag) = self.include_post_meal {
            inputs.include_post_meal = flag;
        }
        if let Some(flag) = self.include_pre_sleep {
            inputs.include_pre_sleep = flag;
        }
        inputs.anchor = self
            .anchor
            .as_ref()
            .map(|overrides| AnchorConfig::default().merged(overrides));
        Ok(inputs)
    }
}

impl From<&PlannerInputs> for PlanRequest {
    fn from(inputs: &PlannerInputs) -> Self {
        let anchor = inputs.anchor.as_ref().map(|a| AnchorOverrides {
            breakfast: Some(a.breakfast),
            pre_workout: Some(a.pre_workout),
            post_workout: Some(a.post_workout),
            pre_sleep: Some(a.pre_sleep),
            pre_workout_mode: Some(a.pre_workout_mode),
        });
        Self {
            wake: Some(inputs.wake),
            sleep: Some(inputs.sleep),
            training_day: Some(inputs.training_day),
            workout: inputs.workout,
            meals_target: Some(inputs.meals_target),
            min_gap_min: Some(inputs.min_gap_min),
            target_gap_min: Some(inputs.target_gap_min),
            totals: Some(inputs.totals.into()),
            preset: Some(inputs.preset),
            include_pre_meal: Some(inputs.include_pre_meal),
            include_post_meal: Some(inputs.include_post_meal),
            include_pre_sleep: Some(inputs.include_pre_sleep),
            anchor,
        }
    }
}
