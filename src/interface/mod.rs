pub mod prompts;
pub mod render;

pub use prompts::{collect_plan_request, prompt_preset, prompt_time, prompt_yes_no};
pub use render::{display_anchors, display_feasibility, display_plan, display_presets, plan_table};
