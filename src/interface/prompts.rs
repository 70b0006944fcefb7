use std::str::FromStr;

use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::config::{PartialTotals, PlanRequest};
use crate::error::{PlanError, Result};
use crate::models::{ClockTime, Preset, WorkoutWindow};
use crate::planner::constants::{DEFAULT_MEALS_TARGET, PRESET_SUGGESTION_THRESHOLD};
use crate::planner::presets::{self, PRESETS};

/// Prompt for a clock time in `HH:MM`.
pub fn prompt_time(prompt: &str, default: ClockTime) -> Result<ClockTime> {
    let input: String = Input::new()
        .with_prompt(format!("{} (HH:MM)", prompt))
        .default(default.to_string())
        .interact_text()?;

    input.trim().parse()
}

/// Prompt for any number type, with a default.
pub fn prompt_number<T>(prompt: &str, default: T) -> Result<T>
where
    T: FromStr + ToString,
{
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidInput(format!("'{}' is not a valid number", input)))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Prompt for a preset name with fuzzy matching.
///
/// Loops until the user settles on a registered preset.
pub fn prompt_preset(default: Preset) -> Result<Preset> {
    loop {
        let input: String = Input::new()
            .with_prompt("Preset")
            .default(default.name().to_string())
            .interact_text()?;

        let input = input.trim();
        if let Ok(entry) = presets::lookup(input) {
            return Ok(entry.preset);
        }

        let wanted = input.to_lowercase();
        let mut candidates: Vec<(Preset, &str, f64)> = PRESETS
            .iter()
            .map(|e| (e.preset, e.name, jaro_winkler(&e.name.to_lowercase(), &wanted)))
            .filter(|(_, _, score)| *score > PRESET_SUGGESTION_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

        match candidates.len() {
            0 => {
                let names: Vec<&str> = PRESETS.iter().map(|e| e.name).collect();
                println!("No preset matches '{}'. Known: {}", input, names.join(", "));
            }
            1 => {
                let (preset, name, _) = candidates[0];
                if prompt_yes_no(&format!("Did you mean '{}'?", name), true)? {
                    return Ok(preset);
                }
            }
            _ => {
                let mut options: Vec<String> =
                    candidates.iter().map(|(_, name, _)| name.to_string()).collect();
                options.push("None of these".to_string());

                let selection = Select::new()
                    .with_prompt("Which did you mean?")
                    .items(&options)
                    .default(0)
                    .interact()?;

                if selection < candidates.len() {
                    return Ok(candidates[selection].0);
                }
            }
        }
    }
}

/// Walk the user through a planning request.
///
/// `defaults` (usually the config file layer) seeds each prompt.
pub fn collect_plan_request(defaults: &PlanRequest) -> Result<PlanRequest> {
    let wake_default = defaults.wake.unwrap_or(ClockTime::from_hm(7, 0)?);
    let sleep_default = defaults.sleep.unwrap_or(ClockTime::from_hm(23, 0)?);

    let wake = prompt_time("Wake time", wake_default)?;
    let sleep = prompt_time("Sleep time", sleep_default)?;

    let totals = defaults.totals.unwrap_or_default();
    let totals = PartialTotals {
        energy_kcal: Some(prompt_number(
            "Daily energy (kcal)",
            totals.energy_kcal.unwrap_or(2000.0),
        )?),
        protein_g: Some(prompt_number("Protein (g)", totals.protein_g.unwrap_or(150.0))?),
        carbs_g: Some(prompt_number("Carbs (g)", totals.carbs_g.unwrap_or(220.0))?),
        fat_g: Some(prompt_number("Fat (g)", totals.fat_g.unwrap_or(60.0))?),
    };

    let meals_target = prompt_number(
        "Number of meals",
        defaults.meals_target.unwrap_or(DEFAULT_MEALS_TARGET),
    )?;

    let training_day = prompt_yes_no(
        "Is today a training day?",
        defaults.training_day.unwrap_or(false),
    )?;
    let workout = if training_day {
        let start = prompt_time("Workout start", ClockTime::from_hm(17, 0)?)?;
        let end = prompt_time("Workout end", ClockTime::from_hm(18, 0)?)?;
        Some(WorkoutWindow { start, end })
    } else {
        None
    };

    let preset = prompt_preset(defaults.preset.unwrap_or_default())?;
    let include_pre_sleep = prompt_yes_no(
        "Keep a meal before sleep?",
        defaults.include_pre_sleep.unwrap_or(true),
    )?;

    Ok(defaults.layered(&PlanRequest {
        wake: Some(wake),
        sleep: Some(sleep),
        training_day: Some(training_day),
        workout,
        meals_target: Some(meals_target),
        totals: Some(totals),
        preset: Some(preset),
        include_pre_sleep: Some(include_pre_sleep),
        ..Default::default()
    }))
}
