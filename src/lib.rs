pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;
pub mod sweep;

pub use error::{PlanError, Result, Violation};
pub use models::{Plan, PlannerInputs, Slot};
pub use planner::{compute_plan, ensure_feasible, validate_plan};
