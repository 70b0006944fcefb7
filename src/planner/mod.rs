pub mod allocation;
pub mod apportion;
pub mod constants;
pub mod feasibility;
pub mod pipeline;
pub mod placement;
pub mod presets;
pub mod validation;

pub use allocation::allocate;
pub use apportion::apportion;
pub use constants::*;
pub use feasibility::{Feasibility, RelaxReason, Relaxation, ensure_feasible};
pub use pipeline::compute_plan;
pub use placement::{
    AnchorIssue, FixedLayout, FixedPoint, PlacedSlot, free_capacity, place_slots,
    resolve_fixed_points,
};
pub use presets::{PRESETS, PresetEntry, SlotContext, SlotWeights};
pub use validation::validate_plan;
