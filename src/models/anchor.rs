use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::MINUTES_PER_DAY;

/// A `[min, max]` minute offset from an anchor's reference event.
///
/// The direction of the offset is fixed by the anchor kind: breakfast and
/// post-workout count forward from wake and workout end, pre-workout and
/// pre-sleep count backward from workout start and sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct AnchorWindow {
    min: u32,
    max: u32,
}

#[derive(Deserialize)]
struct RawWindow {
    min: u32,
    max: u32,
}

impl TryFrom<RawWindow> for AnchorWindow {
    type Error = PlanError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        AnchorWindow::new(raw.min, raw.max)
    }
}

impl AnchorWindow {
    /// Create a window. `min > max` is rejected rather than swapped, and
    /// neither bound may exceed a full day.
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(PlanError::InvalidInput(format!(
                "anchor window min {} exceeds max {}",
                min, max
            )));
        }
        if max > MINUTES_PER_DAY {
            return Err(PlanError::InvalidInput(format!(
                "anchor window max {} min is longer than a day",
                max
            )));
        }
        Ok(Self { min, max })
    }

    const fn fixed(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn min(&self) -> u32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Canonical placement offset (rounded down).
    #[inline]
    pub fn midpoint(&self) -> u32 {
        self.min + (self.max - self.min) / 2
    }
}

/// Named meal roles tied to a reference event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnchorKind {
    Breakfast,
    PreWorkout,
    PostWorkout,
    PreSleep,
}

impl AnchorKind {
    pub const ALL: [AnchorKind; 4] = [
        AnchorKind::Breakfast,
        AnchorKind::PreWorkout,
        AnchorKind::PostWorkout,
        AnchorKind::PreSleep,
    ];

    /// Optional anchors in the order they are dropped during feasibility repair.
    pub const DROP_ORDER: [AnchorKind; 3] = [
        AnchorKind::PostWorkout,
        AnchorKind::PreSleep,
        AnchorKind::PreWorkout,
    ];

    /// Breakfast always exists; everything else can be relaxed away.
    pub fn is_optional(self) -> bool {
        !matches!(self, AnchorKind::Breakfast)
    }

    pub fn is_workout(self) -> bool {
        matches!(self, AnchorKind::PreWorkout | AnchorKind::PostWorkout)
    }

    pub fn label(self) -> &'static str {
        match self {
            AnchorKind::Breakfast => "breakfast",
            AnchorKind::PreWorkout => "pre-workout",
            AnchorKind::PostWorkout => "post-workout",
            AnchorKind::PreSleep => "pre-sleep",
        }
    }

    /// Human-readable reference event, used when rendering anchor tables.
    pub fn reference(self) -> &'static str {
        match self {
            AnchorKind::Breakfast => "after wake",
            AnchorKind::PreWorkout => "before workout start",
            AnchorKind::PostWorkout => "after workout end",
            AnchorKind::PreSleep => "before sleep",
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the pre-workout slot is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreWorkoutMode {
    /// Snack when within the target gap of a neighbouring fixed point, otherwise a meal.
    #[default]
    Auto,
    Snack,
    Meal,
}

/// Anchor windows for every named anchor.
///
/// Missing fields in serialized input take the default window for that
/// anchor only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnchorConfig {
    pub breakfast: AnchorWindow,
    pub pre_workout: AnchorWindow,
    pub post_workout: AnchorWindow,
    pub pre_sleep: AnchorWindow,
    pub pre_workout_mode: PreWorkoutMode,
}

/// Process-wide default anchor table. Read-only; overrides produce new values.
pub const DEFAULT_ANCHORS: AnchorConfig = AnchorConfig {
    breakfast: AnchorWindow::fixed(30, 60),
    pre_workout: AnchorWindow::fixed(60, 120),
    post_workout: AnchorWindow::fixed(30, 90),
    pre_sleep: AnchorWindow::fixed(60, 90),
    pre_workout_mode: PreWorkoutMode::Auto,
};

impl Default for AnchorConfig {
    fn default() -> Self {
        DEFAULT_ANCHORS
    }
}

impl AnchorConfig {
    pub fn window(&self, kind: AnchorKind) -> AnchorWindow {
        match kind {
            AnchorKind::Breakfast => self.breakfast,
            AnchorKind::PreWorkout => self.pre_workout,
            AnchorKind::PostWorkout => self.post_workout,
            AnchorKind::PreSleep => self.pre_sleep,
        }
    }

    /// Copy of this config with one window replaced.
    pub fn with_window(&self, kind: AnchorKind, window: AnchorWindow) -> Self {
        let mut next = self.clone();
        match kind {
            AnchorKind::Breakfast => next.breakfast = window,
            AnchorKind::PreWorkout => next.pre_workout = window,
            AnchorKind::PostWorkout => next.post_workout = window,
            AnchorKind::PreSleep => next.pre_sleep = window,
        }
        next
    }

    /// Shallow merge: every window set in `overrides` replaces ours.
    pub fn merged(&self, overrides: &AnchorOverrides) -> Self {
        Self {
            breakfast: overrides.breakfast.unwrap_or(self.breakfast),
            pre_workout: overrides.pre_workout.unwrap_or(self.pre_workout),
            post_workout: overrides.post_workout.unwrap_or(self.post_workout),
            pre_sleep: overrides.pre_sleep.unwrap_or(self.pre_sleep),
            pre_workout_mode: overrides.pre_workout_mode.unwrap_or(self.pre_workout_mode),
        }
    }
}

/// Partial anchor configuration as read from config files and requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnchorOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<AnchorWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_workout: Option<AnchorWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_workout: Option<AnchorWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_sleep: Option<AnchorWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_workout_mode: Option<PreWorkoutMode>,
}

impl AnchorOverrides {
    /// Layer `top` over `self`; fields set in `top` win.
    pub fn layered(&self, top: &AnchorOverrides) -> Self {
        Self {
            breakfast: top.breakfast.or(self.breakfast),
            pre_workout: top.pre_workout.or(self.pre_workout),
            post_workout: top.post_workout.or(self.post_workout),
            pre_sleep: top.pre_sleep.or(self.pre_sleep),
            pre_workout_mode: top.pre_workout_mode.or(self.pre_workout_mode),
        }
    }
}
