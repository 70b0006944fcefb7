use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{PartialTotals, PlanRequest};
use crate::models::{ClockTime, Preset, WorkoutWindow};

/// meal-slots: spread daily energy and macro targets across anchored meal slots.
#[derive(Parser, Debug)]
#[command(name = "meal-slots")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Planner defaults file (TOML). Falls back to ~/.config/meal-slots/config.toml.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute a plan and print it.
    Plan {
        #[command(flatten)]
        args: PlanArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which anchors survive feasibility repair, without placing slots.
    Check {
        #[command(flatten)]
        args: PlanArgs,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Re-check a saved JSON plan.
    Validate {
        /// Plan file written by `plan --format json`.
        plan: PathBuf,
    },

    /// List weighting presets.
    Presets,

    /// Show anchor windows after config overrides.
    Anchors,

    /// Build a plan request with prompts.
    Interactive {
        /// Save the computed plan as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save the answers as a request file (JSON, or TOML by extension).
        #[arg(long)]
        save_request: Option<PathBuf>,
    },

    /// Write a config file with the built-in defaults.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Interactive {
            output: None,
            save_request: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

/// Request fields settable from the command line. Anything left unset
/// falls through to the request file, then the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Request file (JSON, or TOML by extension).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Wake time, HH:MM.
    #[arg(long)]
    pub wake: Option<ClockTime>,

    /// Sleep time, HH:MM.
    #[arg(long)]
    pub sleep: Option<ClockTime>,

    /// Daily energy in kcal.
    #[arg(long)]
    pub energy: Option<f64>,

    /// Daily protein in grams.
    #[arg(long)]
    pub protein: Option<f64>,

    /// Daily carbs in grams.
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Daily fat in grams.
    #[arg(long)]
    pub fat: Option<f64>,

    /// Weighting preset.
    #[arg(short, long)]
    pub preset: Option<Preset>,

    /// Number of eating occasions.
    #[arg(short, long)]
    pub meals: Option<usize>,

    /// Minimum minutes between slots.
    #[arg(long)]
    pub min_gap: Option<u32>,

    /// Preferred minutes between slots.
    #[arg(long)]
    pub target_gap: Option<u32>,

    /// Treat the day as a training day.
    #[arg(long)]
    pub training: bool,

    /// Workout window, HH:MM-HH:MM. Implies --training.
    #[arg(long)]
    pub workout: Option<WorkoutWindow>,

    /// Skip the pre-workout meal.
    #[arg(long)]
    pub no_pre_meal: bool,

    /// Skip the post-workout meal.
    #[arg(long)]
    pub no_post_meal: bool,

    /// Skip the pre-sleep meal.
    #[arg(long)]
    pub no_pre_sleep: bool,
}

impl PlanArgs {
    /// The flags as the topmost request layer.
    pub fn to_request(&self) -> PlanRequest {
        let totals = PartialTotals {
            energy_kcal: self.energy,
            protein_g: self.protein,
            carbs_g: self.carbs,
            fat_g: self.fat,
        };
        let off = |flag: bool| flag.then_some(false);
        PlanRequest {
            wake: self.wake,
            sleep: self.sleep,
            training_day: (self.training || self.workout.is_some()).then_some(true),
            workout: self.workout,
            meals_target: self.meals,
            min_gap_min: self.min_gap,
            target_gap_min: self.target_gap,
            totals: (totals != PartialTotals::default()).then_some(totals),
            preset: self.preset,
            include_pre_meal: off(self.no_pre_meal),
            include_post_meal: off(self.no_post_meal),
            include_pre_sleep: off(self.no_pre_sleep),
            anchor: None,
        }
    }
}
