use std::fmt::Write as _;

use crate::models::{AnchorConfig, AnchorKind, Nutrient, Plan};
use crate::planner::{Feasibility, PRESETS};

/// Format a plan as an aligned text table with a totals footer.
pub fn plan_table(plan: &Plan) -> String {
    let mut out = String::new();
    if plan.is_empty() {
        out.push_str("No slots in plan.\n");
        return out;
    }

    let role_width = plan
        .slots
        .iter()
        .map(|s| s.role.to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let _ = writeln!(
        out,
        "{:>3}  {:<5}  {:<rw$}  {:<5}  {:>6}  {:>6}  {:>6}  {:>6}",
        "#",
        "time",
        "role",
        "kind",
        "kcal",
        "P (g)",
        "C (g)",
        "F (g)",
        rw = role_width
    );
    for (i, slot) in plan.slots.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<5}  {:<rw$}  {:<5}  {:>6}  {:>6}  {:>6}  {:>6}",
            i + 1,
            slot.time.to_string(),
            slot.role.to_string(),
            slot.kind.to_string(),
            slot.energy_kcal,
            slot.protein_g,
            slot.carbs_g,
            slot.fat_g,
            rw = role_width
        );
    }

    let _ = writeln!(
        out,
        "{:>3}  {:<5}  {:<rw$}  {:<5}  {:>6}  {:>6}  {:>6}  {:>6}",
        "",
        "",
        "total",
        "",
        plan.total_energy(),
        plan.total_grams(Nutrient::Protein),
        plan.total_grams(Nutrient::Carbs),
        plan.total_grams(Nutrient::Fat),
        rw = role_width
    );
    out
}

/// Print a plan with its header and any relaxed anchors.
pub fn display_plan(plan: &Plan) {
    let inputs = &plan.inputs;
    println!();
    println!(
        "=== Meal Plan ({} day, preset {}) ===",
        if inputs.training_day { "training" } else { "rest" },
        inputs.preset
    );
    println!(
        "Awake {}-{}, {} slots ({} anchored, {} free), min gap {} min",
        inputs.wake,
        inputs.sleep,
        plan.len(),
        plan.fixed_count(),
        plan.free_count(),
        inputs.min_gap_min
    );
    if let Some(workout) = inputs.workout {
        println!("Workout {}-{}", workout.start, workout.end);
    }
    println!();
    print!("{}", plan_table(plan));

    if !plan.relaxations.is_empty() {
        println!();
        println!("--- Relaxed anchors ---");
        for r in &plan.relaxations {
            println!("  {}: {}", r.anchor, r.reason);
        }
    }
    println!();
}

/// Print what feasibility repair decided, without placing slots.
pub fn display_feasibility(report: &Feasibility) {
    let inputs = &report.inputs;
    let (earliest, latest) = inputs.eating_window();

    println!();
    println!("=== Feasibility ===");
    println!();
    println!(
        "Eating window: {:02}:{:02}-{:02}:{:02}",
        earliest / 60,
        earliest % 60,
        latest / 60,
        latest % 60
    );
    println!("Requested slots: {}", inputs.meals_target);

    println!();
    println!("Fixed points:");
    if report.fixed_points.is_empty() {
        println!("  (none)");
    }
    for point in &report.fixed_points {
        println!("  {}  {}", point.time, point.anchor);
    }

    if !report.relaxations.is_empty() {
        println!();
        println!("Relaxed:");
        for r in &report.relaxations {
            println!("  {}: {}", r.anchor, r.reason);
        }
    }
    if !report.issues.is_empty() {
        println!();
        println!("Unresolved:");
        for issue in &report.issues {
            println!("  {}", issue);
        }
    }

    println!();
    println!(
        "Free meals: {} (room for {})",
        report.free_meals, report.free_capacity
    );
    let status = if report.is_placeable() {
        "feasible"
    } else {
        "infeasible"
    };
    if report.fallback {
        println!("Status: {} (all optional anchors relaxed)", status);
    } else {
        println!("Status: {}", status);
    }
    println!();
}

/// Print the preset registry.
pub fn display_presets() {
    let width = PRESETS.iter().map(|e| e.name.len()).max().unwrap_or(8);

    println!();
    println!("=== Presets ({} registered) ===", PRESETS.len());
    println!();
    for entry in PRESETS.iter() {
        println!("  {:<width$}  {}", entry.name, entry.description, width = width);
    }
    println!();
}

/// Print anchor windows relative to their reference events.
pub fn display_anchors(config: &AnchorConfig) {
    println!();
    println!("=== Anchor windows ===");
    println!();
    for kind in AnchorKind::ALL {
        let window = config.window(kind);
        let optional = if kind.is_optional() { "" } else { " (required)" };
        println!(
            "  {:<12}  {:>3}-{:<3} min {}{}",
            kind.label(),
            window.min(),
            window.max(),
            kind.reference(),
            optional
        );
    }
    println!("  pre-workout mode: {:?}", config.pre_workout_mode);
    println!();
}
