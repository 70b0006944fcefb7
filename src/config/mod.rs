//! Planner defaults and request merging.
//!
//! Inputs are resolved once, at the boundary, with the chain
//! CLI flags > request file > config file > built-in defaults.

mod file;
mod request;

pub use file::{ConfigFile, config_dir, config_path, load_config, save_config};
pub use request::{PartialTotals, PlanRequest};
