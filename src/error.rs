use thiserror::Error;

use crate::models::{ClockTime, Nutrient};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Infeasible constraint: {0}")]
    InfeasibleConstraint(String),

    #[error("Plan invariant violated: {0}")]
    Violation(#[from] Violation),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// A specific plan property that failed re-derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{nutrient} sums to {actual} g, expected exactly {expected} g (off by {})", actual.abs_diff(*expected))]
    MacroConservation {
        nutrient: Nutrient,
        expected: u32,
        actual: u32,
    },

    #[error("energy sums to {actual} kcal, expected {expected} ± {tolerance} (off by {})", actual.abs_diff(*expected))]
    EnergyConservation {
        expected: u32,
        actual: u32,
        tolerance: u32,
    },

    #[error("plan has {actual} slots, expected {expected}")]
    SlotCount { expected: usize, actual: usize },

    #[error("slot {index} at {current} comes before the previous slot at {previous}")]
    Ordering {
        index: usize,
        previous: ClockTime,
        current: ClockTime,
    },

    #[error("two slots share the time {time}")]
    DuplicateTime { time: ClockTime },
}

pub type Result<T> = std::result::Result<T, PlanError>;
