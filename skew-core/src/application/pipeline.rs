// skew-core/src/application/pipeline.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::domain::chart::{FramedChart, Narrative, optimistic_chart, skeptical_chart};
use crate::domain::config::ProjectConfig;
use crate::domain::summary::{Aggregator, SummaryTable};
use crate::domain::views::{OptimisticView, SkepticalView};
use crate::error::SkewError;
use crate::infrastructure::export::export_summary;
use crate::infrastructure::fs::atomic_write;
use crate::ports::{ArtifactKind, ChartRenderer, RecordSource, RunEvent, RunReporter};

/// Which artifacts a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Summary file and both charts.
    Full,
    /// Summary file only.
    Analyze,
    /// Both charts only.
    Visualize,
}

impl Stage {
    fn exports_summary(&self) -> bool {
        matches!(self, Stage::Full | Stage::Analyze)
    }

    fn renders_charts(&self) -> bool {
        matches!(self, Stage::Full | Stage::Visualize)
    }
}

#[derive(Debug)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub error: Option<String>,
}

impl ArtifactOutcome {
    pub fn is_written(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub records: usize,
    pub artifacts: Vec<ArtifactOutcome>,
    pub errors: Vec<String>,
}

/// Load, aggregate, then export and/or render depending on `stage`.
///
/// Loading and schema problems abort the run with an error. Once the data
/// is aggregated, each artifact succeeds or fails on its own: a failed chart
/// is recorded in the result and the remaining artifacts are still produced.
#[instrument(skip_all, fields(stage = ?stage, project = %config.name))]
pub fn run_pipeline<S, R>(
    source: &S,
    renderer: &R,
    reporter: &mut dyn RunReporter,
    config: &ProjectConfig,
    project_dir: &Path,
    stage: Stage,
) -> Result<RunResult, SkewError>
where
    S: RecordSource + ?Sized,
    R: ChartRenderer + ?Sized,
{
    let start_time = Instant::now();

    // 1. LOAD
    let description = source.describe();
    let records = source.load_records()?;

    // 2. AGGREGATE (never filtered by year)
    let aggregates = Aggregator::aggregate(&records);
    reporter.report(RunEvent::DatasetLoaded {
        source: &description,
        records: records.len(),
        span: aggregates.yearly.span(),
    });

    let range = config.analysis_range;
    let yearly = aggregates.yearly.within(range);
    reporter.report(RunEvent::SummaryReady {
        table: &yearly,
        range,
    });
    reporter.report(RunEvent::CategoriesReady {
        table: &aggregates.by_ethnicity,
    });
    reporter.report(RunEvent::CategoriesReady {
        table: &aggregates.by_allegation_type,
    });

    // 3. OUTPUTS
    let output_dir = config.output_dir_in(project_dir);
    if let Err(e) = fs::create_dir_all(&output_dir) {
        warn!(dir = ?output_dir, error = %e, "Could not create output directory");
    }

    let mut artifacts = Vec::new();

    if stage.exports_summary() {
        let path = output_dir.join(&config.summary_file);
        let outcome = export_summary(&yearly, &path).map_err(SkewError::from);
        artifacts.push(record_outcome(reporter, ArtifactKind::Summary, path, outcome));
    }

    if stage.renders_charts() {
        // Two independent branches, run one after the other.
        for narrative in [Narrative::Optimistic, Narrative::Skeptical] {
            let (file, built) = match narrative {
                Narrative::Optimistic => (
                    &config.charts.optimistic.output_file,
                    build_optimistic(&yearly, config),
                ),
                Narrative::Skeptical => (
                    &config.charts.skeptical.output_file,
                    build_skeptical(&yearly, config),
                ),
            };
            let path = output_dir.join(file);
            let outcome = built.and_then(|chart| {
                let html = renderer.render(&chart.spec)?;
                atomic_write(&path, html)?;
                Ok(chart)
            });

            let kind = ArtifactKind::Chart(narrative);
            match outcome {
                Ok(chart) => {
                    artifacts.push(record_outcome(reporter, kind, path, Ok(())));
                    reporter.report(RunEvent::FramingDisclosed { chart: &chart });
                }
                Err(e) => artifacts.push(record_outcome(reporter, kind, path, Err(e))),
            }
        }
    }

    let errors: Vec<String> = artifacts.iter().filter_map(|a| a.error.clone()).collect();
    let written = artifacts.len() - errors.len();
    reporter.report(RunEvent::Completed {
        written,
        failed: errors.len(),
    });
    info!(
        written,
        failed = errors.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Run finished"
    );

    Ok(RunResult {
        success: errors.is_empty(),
        records: records.len(),
        artifacts,
        errors,
    })
}

fn build_optimistic(yearly: &SummaryTable, config: &ProjectConfig) -> Result<FramedChart, SkewError> {
    let view = OptimisticView::select(yearly, config.charts.optimistic.start_year)?;
    Ok(optimistic_chart(
        &view,
        &config.charts.optimistic,
        &config.source_label,
    ))
}

fn build_skeptical(yearly: &SummaryTable, config: &ProjectConfig) -> Result<FramedChart, SkewError> {
    let view = SkepticalView::select(yearly)?;
    Ok(skeptical_chart(
        &view,
        &config.charts.skeptical,
        &config.source_label,
    ))
}

fn record_outcome(
    reporter: &mut dyn RunReporter,
    kind: ArtifactKind,
    path: PathBuf,
    outcome: Result<(), SkewError>,
) -> ArtifactOutcome {
    match outcome {
        Ok(()) => {
            info!(%kind, path = ?path, "Artifact written");
            reporter.report(RunEvent::ArtifactWritten { kind, path: &path });
            ArtifactOutcome {
                kind,
                path,
                error: None,
            }
        }
        Err(error) => {
            warn!(%kind, path = ?path, %error, "Artifact failed");
            reporter.report(RunEvent::ArtifactFailed {
                kind,
                path: &path,
                error: &error,
            });
            ArtifactOutcome {
                kind,
                path,
                error: Some(error.to_string()),
            }
        }
    }
}
