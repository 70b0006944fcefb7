use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meal_slot_planner::cli::{Cli, Command, Format, PlanArgs};
use meal_slot_planner::config::{ConfigFile, PlanRequest, config_path, load_config, save_config};
use meal_slot_planner::error::Result;
use meal_slot_planner::interface::{
    collect_plan_request, display_anchors, display_feasibility, display_plan, display_presets,
    plan_table,
};
use meal_slot_planner::models::{AnchorConfig, Plan, Preset};
use meal_slot_planner::planner::{
    DEFAULT_MEALS_TARGET, DEFAULT_MIN_GAP_MIN, DEFAULT_TARGET_GAP_MIN, compute_plan,
    ensure_feasible, validate_plan,
};
use meal_slot_planner::state::{
    load_plan, load_request, save_plan_csv, save_plan_json, save_request, write_plan_csv,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command.unwrap_or_default() {
        Command::Plan {
            args,
            format,
            output,
        } => cmd_plan(config, &args, format, output.as_deref()),
        Command::Check { args, json } => cmd_check(config, &args, json),
        Command::Validate { plan } => cmd_validate(&plan),
        Command::Presets => {
            display_presets();
            Ok(())
        }
        Command::Anchors => cmd_anchors(config),
        Command::Interactive {
            output,
            save_request,
        } => cmd_interactive(config, output.as_deref(), save_request.as_deref()),
        Command::InitConfig { force } => cmd_init_config(config, force),
    }
}

/// Layer config file, request file and flags, lowest first.
fn resolve_request(config: Option<&Path>, args: &PlanArgs) -> Result<PlanRequest> {
    let defaults = load_config(config)?.defaults;
    let file = match &args.input {
        Some(path) => load_request(path)?,
        None => PlanRequest::default(),
    };
    Ok(defaults.layered(&file).layered(&args.to_request()))
}

/// Compute a plan and render it in the requested format.
fn cmd_plan(
    config: Option<&Path>,
    args: &PlanArgs,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    let inputs = resolve_request(config, args)?.resolve()?;
    let plan = compute_plan(&inputs)?;

    match (format, output) {
        (Format::Table, None) => display_plan(&plan),
        (Format::Table, Some(path)) => fs::write(path, plan_table(&plan))?,
        (Format::Json, None) => println!("{}", serde_json::to_string_pretty(&plan)?),
        (Format::Json, Some(path)) => save_plan_json(path, &plan)?,
        (Format::Csv, None) => write_plan_csv(io::stdout().lock(), &plan)?,
        (Format::Csv, Some(path)) => save_plan_csv(path, &plan)?,
    }

    if let Some(path) = output {
        println!("Plan with {} slots written to {:?}", plan.len(), path);
    }
    Ok(())
}

/// Print the feasibility report only.
fn cmd_check(config: Option<&Path>, args: &PlanArgs, json: bool) -> Result<()> {
    let inputs = resolve_request(config, args)?.resolve()?;
    let report = ensure_feasible(&inputs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_feasibility(&report);
    }
    Ok(())
}

/// Re-derive a saved plan's guarantees.
fn cmd_validate(path: &Path) -> Result<()> {
    let plan: Plan = load_plan(path)?;
    validate_plan(&plan, &plan.inputs.totals)?;
    println!(
        "Plan OK: {} slots, {} kcal, totals conserved.",
        plan.len(),
        plan.total_energy()
    );
    Ok(())
}

fn cmd_anchors(config: Option<&Path>) -> Result<()> {
    let defaults = load_config(config)?.defaults;
    let anchors = match &defaults.anchor {
        Some(overrides) => AnchorConfig::default().merged(overrides),
        None => AnchorConfig::default(),
    };
    display_anchors(&anchors);
    Ok(())
}

/// Prompt for a request, then plan it.
fn cmd_interactive(
    config: Option<&Path>,
    output: Option<&Path>,
    save_request_to: Option<&Path>,
) -> Result<()> {
    let defaults = load_config(config)?.defaults;
    let request = collect_plan_request(&defaults)?;

    if let Some(path) = save_request_to {
        save_request(path, &request)?;
        println!("Request saved to {:?}", path);
    }

    let inputs = request.resolve()?;
    let plan = compute_plan(&inputs)?;
    display_plan(&plan);

    if let Some(path) = output {
        save_plan_json(path, &plan)?;
        println!("Plan saved to {:?}", path);
    }
    Ok(())
}

/// Write the built-in defaults as a starting config.
fn cmd_init_config(config: Option<&Path>, force: bool) -> Result<()> {
    let path: PathBuf = config.map(Path::to_path_buf).unwrap_or_else(config_path);

    if path.exists() && !force {
        println!("Config already exists at {:?} (use --force to overwrite).", path);
        return Ok(());
    }

    let file = ConfigFile {
        defaults: PlanRequest {
            meals_target: Some(DEFAULT_MEALS_TARGET),
            min_gap_min: Some(DEFAULT_MIN_GAP_MIN),
            target_gap_min: Some(DEFAULT_TARGET_GAP_MIN),
            preset: Some(Preset::default()),
            include_pre_meal: Some(true),
            include_post_meal: Some(true),
            include_pre_sleep: Some(true),
            ..Default::default()
        },
    };
    save_config(&file, &path)?;
    println!("Wrote defaults to {:?}", path);
    Ok(())
}
