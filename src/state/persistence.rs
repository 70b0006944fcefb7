use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::PlanRequest;
use crate::error::Result;
use crate::models::Plan;

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Load a planning request. `.toml` files are read as TOML, anything else
/// as JSON.
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<PlanRequest> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let request = if is_toml(path) {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    tracing::debug!(path = %path.display(), "loaded plan request");
    Ok(request)
}

/// Save a request as JSON or TOML, picked by extension like `load_request`.
pub fn save_request<P: AsRef<Path>>(path: P, request: &PlanRequest) -> Result<()> {
    let path = path.as_ref();
    let text = if is_toml(path) {
        toml::to_string_pretty(request)?
    } else {
        serde_json::to_string_pretty(request)?
    };
    fs::write(path, text)?;
    Ok(())
}

/// Load a previously saved JSON plan.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<Plan> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Save a plan as pretty JSON, including the adjusted inputs.
pub fn save_plan_json<P: AsRef<Path>>(path: P, plan: &Plan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write one CSV row per slot.
pub fn write_plan_csv<W: Write>(writer: W, plan: &Plan) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "time",
        "role",
        "kind",
        "fixed",
        "energy_kcal",
        "protein_g",
        "carbs_g",
        "fat_g",
    ])?;

    for slot in &plan.slots {
        wtr.write_record([
            slot.time.to_string(),
            slot.role.to_string(),
            slot.kind.to_string(),
            slot.fixed.to_string(),
            slot.energy_kcal.to_string(),
            slot.protein_g.to_string(),
            slot.carbs_g.to_string(),
            slot.fat_g.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_plan_csv<P: AsRef<Path>>(path: P, plan: &Plan) -> Result<()> {
    let file = fs::File::create(path)?;
    write_plan_csv(file, plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, DailyTotals, PlannerInputs, Preset};
    use crate::planner::compute_plan;
    use std::io::Write as _;
    use tempfile::{Builder, NamedTempFile};

    fn plan() -> Plan {
        let inputs = PlannerInputs::new(
            ClockTime::from_hm(7, 0).unwrap(),
            ClockTime::from_hm(23, 0).unwrap(),
            DailyTotals::new(2000.0, 150.0, 220.0, 60.0),
        );
        compute_plan(&inputs).unwrap()
    }

    #[test]
    fn test_load_json_request() {
        let json = r#"{"wake": "06:00", "sleep": "22:00", "preset": "pmCarbs"}"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let request = load_request(file.path()).unwrap();
        assert_eq!(request.preset, Some(Preset::PmCarbs));
        assert!(request.totals.is_none());
    }

    #[test]
    fn test_load_toml_request() {
        let text = "wake = \"06:00\"\nsleep = \"22:00\"\nmealsTarget = 5\n\n[totals]\nenergyKcal = 2200\n";
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(text.as_bytes()).unwrap();

        let request = load_request(file.path()).unwrap();
        assert_eq!(request.meals_target, Some(5));
        assert_eq!(request.totals.and_then(|t| t.energy_kcal), Some(2200.0));
    }

    #[test]
    fn test_malformed_request_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(load_request(file.path()).is_err());
    }

    #[test]
    fn test_saved_plan_reloads() {
        let plan = plan();
        let file = NamedTempFile::new().unwrap();
        save_plan_json(file.path(), &plan).unwrap();
        assert_eq!(load_plan(file.path()).unwrap(), plan);
    }

    #[test]
    fn test_saved_request_reloads_as_toml() {
        let request = PlanRequest::from(&plan().inputs);
        let file = Builder::new().suffix(".toml").tempfile().unwrap();
        save_request(file.path(), &request).unwrap();
        assert_eq!(load_request(file.path()).unwrap(), request);
    }

    #[test]
    fn test_csv_has_row_per_slot() {
        let plan = plan();
        let mut buf = Vec::new();
        write_plan_csv(&mut buf, &plan).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), plan.len() + 1);
        assert!(lines[0].starts_with("time,role,kind,fixed"));
        assert!(lines[1].starts_with("07:45,breakfast,meal,true"));
    }
}
