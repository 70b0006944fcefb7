use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{AnchorKind, ClockTime, Nutrient, PlannerInputs};
use crate::planner::feasibility::Relaxation;

/// What a slot is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotRole {
    Breakfast,
    PreWorkout,
    PostWorkout,
    PreSleep,
    /// Filler meal spread between the anchors.
    Free,
}

impl SlotRole {
    pub fn anchor(self) -> Option<AnchorKind> {
        match self {
            SlotRole::Breakfast => Some(AnchorKind::Breakfast),
            SlotRole::PreWorkout => Some(AnchorKind::PreWorkout),
            SlotRole::PostWorkout => Some(AnchorKind::PostWorkout),
            SlotRole::PreSleep => Some(AnchorKind::PreSleep),
            SlotRole::Free => None,
        }
    }

    pub fn is_fixed(self) -> bool {
        self.anchor().is_some()
    }
}

impl From<AnchorKind> for SlotRole {
    fn from(kind: AnchorKind) -> Self {
        match kind {
            AnchorKind::Breakfast => SlotRole::Breakfast,
            AnchorKind::PreWorkout => SlotRole::PreWorkout,
            AnchorKind::PostWorkout => SlotRole::PostWorkout,
            AnchorKind::PreSleep => SlotRole::PreSleep,
        }
    }
}

impl fmt::Display for SlotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.anchor() {
            Some(kind) => f.write_str(kind.label()),
            None => f.write_str("meal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Meal,
    Snack,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotKind::Meal => "meal",
            SlotKind::Snack => "snack",
        })
    }
}

/// One allocated eating occasion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub time: ClockTime,
    pub role: SlotRole,
    pub kind: SlotKind,
    /// Anchor-derived fixed point rather than a free meal.
    pub fixed: bool,
    pub energy_kcal: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

impl Slot {
    pub fn grams(&self, nutrient: Nutrient) -> u32 {
        match nutrient {
            Nutrient::Protein => self.protein_g,
            Nutrient::Carbs => self.carbs_g,
            Nutrient::Fat => self.fat_g,
        }
    }
}

/// The day's slots in time order plus the inputs they were built from.
///
/// `inputs` echoes the feasibility-adjusted copy, so disabled optional
/// anchors show up as cleared flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub slots: Vec<Slot>,
    pub inputs: PlannerInputs,
    #[serde(default)]
    pub relaxations: Vec<Relaxation>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_energy(&self) -> u32 {
        self.slots.iter().map(|s| s.energy_kcal).sum()
    }

    pub fn total_grams(&self, nutrient: Nutrient) -> u32 {
        self.slots.iter().map(|s| s.grams(nutrient)).sum()
    }

    pub fn fixed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.fixed).count()
    }

    pub fn free_count(&self) -> usize {
        self.len() - self.fixed_count()
    }
}
