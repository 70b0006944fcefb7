mod anchor;
mod inputs;
mod plan;
mod time;

pub use anchor::{AnchorConfig, AnchorKind, AnchorOverrides, AnchorWindow, PreWorkoutMode};
pub use inputs::{DailyTotals, Nutrient, PlannerInputs, Preset, WorkoutWindow};
pub use plan::{Plan, Slot, SlotKind, SlotRole};
pub use time::{ClockTime, MINUTES_PER_DAY};
#[cfg(test)]
pub(crate) use anchor::DEFAULT_ANCHORS;
