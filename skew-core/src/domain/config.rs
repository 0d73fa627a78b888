// skew-core/src/domain/config.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

use crate::domain::chart::spec::AxisRange;
use crate::domain::summary::YearRange;

pub const DEFAULT_INPUT_PATH: &str = "CCRB-Complaint-Data_202007271729/allegations_202007271729.csv";

/// Everything a run needs to know. Every field has a default, so an absent
/// config file means "the published dataset layout".
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(default, rename_all = "kebab-case")]
#[validate(schema(function = "validate_project"))]
pub struct ProjectConfig {
    pub name: String,

    /// CSV export, relative to the project directory unless absolute.
    #[validate(length(min = 1, message = "input-path cannot be empty"))]
    pub input_path: String,

    pub output_dir: String,

    #[validate(length(min = 1, message = "summary-file cannot be empty"))]
    pub summary_file: String,

    /// Years kept for the exported summary and both charts.
    pub analysis_range: YearRange,

    /// Attribution printed under each chart.
    pub source_label: String,

    #[validate(nested)]
    pub charts: ChartsConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "ccrb-substantiation".to_string(),
            input_path: DEFAULT_INPUT_PATH.to_string(),
            output_dir: ".".to_string(),
            summary_file: "yearly_stats.json".to_string(),
            analysis_range: YearRange {
                start: 2000,
                end: 2019,
            },
            source_label: "NYC Civilian Complaint Review Board (CCRB)".to_string(),
            charts: ChartsConfig::default(),
        }
    }
}

impl ProjectConfig {
    pub fn input_path_in(&self, project_dir: &Path) -> PathBuf {
        resolve(project_dir, &self.input_path)
    }

    pub fn output_dir_in(&self, project_dir: &Path) -> PathBuf {
        resolve(project_dir, &self.output_dir)
    }
}

fn resolve(project_dir: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate, Default)]
#[serde(default)]
pub struct ChartsConfig {
    #[validate(nested)]
    pub optimistic: OptimisticChartConfig,
    #[validate(nested)]
    pub skeptical: SkepticalChartConfig,
}

/// The "improvement" framing.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(default, rename_all = "kebab-case")]
pub struct OptimisticChartConfig {
    pub start_year: i32,

    /// Deliberately not anchored at zero.
    #[validate(custom(function = "validate_axis"))]
    pub rate_axis: AxisRange,

    #[validate(length(min = 1))]
    pub output_file: String,

    #[validate(range(min = 200, max = 4000))]
    pub height: u32,
}

impl Default for OptimisticChartConfig {
    fn default() -> Self {
        Self {
            start_year: 2010,
            rate_axis: AxisRange::new(15.0, 37.0),
            output_file: "visualization_for.html".to_string(),
            height: 600,
        }
    }
}

/// The "no real change" framing.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(default, rename_all = "kebab-case")]
pub struct SkepticalChartConfig {
    #[validate(custom(function = "validate_axis"))]
    pub rate_axis: AxisRange,

    #[validate(length(min = 1))]
    pub output_file: String,

    #[validate(range(min = 200, max = 4000))]
    pub height: u32,
}

impl Default for SkepticalChartConfig {
    fn default() -> Self {
        Self {
            rate_axis: AxisRange::new(0.0, 40.0),
            output_file: "visualization_against.html".to_string(),
            height: 900,
        }
    }
}

fn validate_axis(range: &AxisRange) -> Result<(), ValidationError> {
    if !(range.min.is_finite() && range.max.is_finite()) || range.min >= range.max {
        return Err(ValidationError::new("axis_range")
            .with_message("axis range must satisfy min < max".into()));
    }
    Ok(())
}

fn validate_project(config: &ProjectConfig) -> Result<(), ValidationError> {
    let range = YearRange::new(config.analysis_range.start, config.analysis_range.end)
        .map_err(|e| ValidationError::new("analysis_range").with_message(e.to_string().into()))?;

    let start = config.charts.optimistic.start_year;
    if !range.contains(start) {
        return Err(ValidationError::new("start_year").with_message(
            format!("optimistic start-year {} is outside analysis-range {}", start, range).into(),
        ));
    }

    // Both charts and the summary share one directory.
    let outputs = [
        &config.summary_file,
        &config.charts.optimistic.output_file,
        &config.charts.skeptical.output_file,
    ];
    for (i, a) in outputs.iter().enumerate() {
        if outputs[i + 1..].contains(a) {
            return Err(ValidationError::new("output_file")
                .with_message(format!("output file '{}' is used twice", a).into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ProjectConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> anyhow::Result<()> {
        let yaml = "name: demo\ncharts:\n  optimistic:\n    start-year: 2012\n";
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.name, "demo");
        assert_eq!(config.charts.optimistic.start_year, 2012);
        assert_eq!(config.charts.optimistic.rate_axis, AxisRange::new(15.0, 37.0));
        assert_eq!(config.charts.skeptical.output_file, "visualization_against.html");
        assert_eq!(config.analysis_range, YearRange { start: 2000, end: 2019 });
        Ok(())
    }

    #[test]
    fn test_reversed_analysis_range_is_rejected() {
        let mut config = ProjectConfig::default();
        config.analysis_range = YearRange { start: 2019, end: 2000 };
        config.charts.optimistic.start_year = 2010;
        let message = config.validate().err().map(|e| e.to_string());
        assert!(message.is_some_and(|m| m.contains("Invalid year range: 2019..=2000")));
    }

    #[test]
    fn test_start_year_outside_range_is_rejected() {
        let mut config = ProjectConfig::default();
        config.charts.optimistic.start_year = 2025;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_axis_is_rejected() {
        let mut config = ProjectConfig::default();
        config.charts.skeptical.rate_axis = AxisRange::new(40.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_colliding_outputs_are_rejected() {
        let mut config = ProjectConfig::default();
        config.charts.skeptical.output_file = config.charts.optimistic.output_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_path_resolution() {
        let config = ProjectConfig {
            output_dir: "/abs/out".to_string(),
            ..ProjectConfig::default()
        };
        let dir = Path::new("project");
        assert_eq!(config.output_dir_in(dir), PathBuf::from("/abs/out"));
        assert_eq!(
            config.input_path_in(dir),
            Path::new("project").join(DEFAULT_INPUT_PATH)
        );
    }
}
