use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::PlanRequest;
use crate::error::Result;

/// Contents of `config.toml`.
///
/// ```toml
/// [defaults]
/// preset = "backload"
/// mealsTarget = 5
///
/// [defaults.anchor.preSleep]
/// min = 45
/// max = 75
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: PlanRequest,
}

/// `$XDG_CONFIG_HOME/meal-slots`, or `~/.config/meal-slots`.
///
/// XDG layout is used on every platform, including macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("meal-slots");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("meal-slots")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load planner defaults.
///
/// An explicit path must exist. Without one, a missing default config
/// file yields empty defaults.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = config_path();
            if !p.exists() {
                tracing::debug!(path = %p.display(), "no config file, using built-in defaults");
                return Ok(ConfigFile::default());
            }
            p
        }
    };
    let contents = fs::read_to_string(&path)?;
    let config: ConfigFile = toml::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Write `config` as pretty TOML, creating parent directories.
pub fn save_config(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Preset;
    use tempfile::tempdir;

    #[test]
    fn test_parse_partial_config() {
        let text = r#"
            [defaults]
            preset = "backload"
            mealsTarget = 5
            includePreSleep = false

            [defaults.anchor.preSleep]
            min = 45
            max = 75
        "#;
        let config: ConfigFile = toml::from_str(text).unwrap();
        assert_eq!(config.defaults.preset, Some(Preset::Backload));
        assert_eq!(config.defaults.meals_target, Some(5));
        assert_eq!(config.defaults.include_pre_sleep, Some(false));
        let anchor = config.defaults.anchor.unwrap();
        assert_eq!(anchor.pre_sleep.map(|w| w.min()), Some(45));
        assert!(anchor.breakfast.is_none());
    }

    #[test]
    fn test_empty_file_is_empty_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_bad_preset_in_config_fails() {
        let text = "[defaults]\npreset = \"ketoo\"\n";
        assert!(toml::from_str::<ConfigFile>(text).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConfigFile {
            defaults: PlanRequest {
                min_gap_min: Some(150),
                preset: Some(Preset::RestAm),
                ..Default::default()
            },
        };
        save_config(&config, &path).unwrap();
        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        let dir = tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
