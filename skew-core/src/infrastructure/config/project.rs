// skew-core/src/infrastructure/config/project.rs

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::config::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

/// Looked up in order inside the project directory.
pub const CONFIG_CANDIDATES: [&str; 2] = ["skew.yaml", "skew_project.yaml"];

pub const ENV_INPUT_PATH: &str = "SKEW_INPUT_PATH";
pub const ENV_OUTPUT_DIR: &str = "SKEW_OUTPUT_DIR";

/// Loads `skew.yaml` (or `skew_project.yaml`) from `project_dir`, falls back
/// to defaults when neither exists, then applies environment overrides and
/// validates the result.
#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let mut config = match find_main_config(project_dir) {
        Some(config_path) => {
            info!(path = ?config_path, "Loading project config");
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read project config at {:?}", config_path))?;
            serde_yaml::from_str::<ProjectConfig>(&content).with_context(|| {
                format!("Failed to parse project config YAML at {:?}", config_path)
            })?
        }
        None => {
            info!(dir = ?project_dir, "No project config found, using defaults");
            ProjectConfig::default()
        }
    };

    // SKEW_OUTPUT_DIR=/tmp/charts skew run
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(format!("Invalid project config: {}", e)))?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|filename| root.join(filename))
        .find(|p| p.exists())
}

fn apply_env_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup(ENV_INPUT_PATH) {
        info!(old = ?config.input_path, new = ?val, "Overriding input path via ENV");
        config.input_path = val;
    }
    if let Some(val) = lookup(ENV_OUTPUT_DIR) {
        info!(old = ?config.output_dir, new = ?val, "Overriding output dir via ENV");
        config.output_dir = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::AxisRange;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_means_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = load_project_config(dir.path())?;
        assert_eq!(config.summary_file, "yearly_stats.json");
        assert_eq!(config.charts.optimistic.start_year, 2010);
        Ok(())
    }

    #[test]
    fn test_yaml_is_loaded() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("skew.yaml"),
            "name: fixture\ninput-path: data/allegations.csv\noutput-dir: out\ncharts:\n  skeptical:\n    rate-axis: { min: 0, max: 50 }\n",
        )?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "fixture");
        assert_eq!(config.input_path, "data/allegations.csv");
        assert_eq!(config.charts.skeptical.rate_axis, AxisRange::new(0.0, 50.0));
        Ok(())
    }

    #[test]
    fn test_fallback_file_name() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("skew_project.yaml"), "name: legacy\n")?;
        assert_eq!(load_project_config(dir.path())?.name, "legacy");
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_is_a_config_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("skew.yaml"), "charts: [unclosed\n")?;
        assert!(matches!(
            load_project_config(dir.path()),
            Err(InfrastructureError::ConfigError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_validation_runs_after_load() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("skew.yaml"),
            "charts:\n  optimistic:\n    start-year: 1990\n",
        )?;
        let err = load_project_config(dir.path()).err();
        assert!(matches!(err, Some(InfrastructureError::ConfigError(msg)) if msg.contains("Invalid project config")));
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProjectConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            ENV_OUTPUT_DIR => Some("/tmp/charts".to_string()),
            _ => None,
        });
        assert_eq!(config.output_dir, "/tmp/charts");
        assert_eq!(config.input_path, crate::domain::config::DEFAULT_INPUT_PATH);
    }
}
