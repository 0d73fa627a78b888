// skew/src/commands/mod.rs

pub mod analyze;
pub mod run;
pub mod visualize;

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use skew_core::application::{RunResult, Stage, run_pipeline};
use skew_core::infrastructure::adapters::DuckDbRecordSource;
use skew_core::infrastructure::config::load_project_config;
use skew_core::infrastructure::render::HtmlChartRenderer;
use skew_core::SkewError;

use crate::report::ConsoleReporter;

/// Shared body of every subcommand: config, adapters, pipeline, exit code.
///
/// Any fatal error or failed artifact ends the process with status 1.
pub(crate) fn execute_stage(project_dir: &Path, stage: Stage) -> anyhow::Result<()> {
    let start = Instant::now();

    println!("⚙️  Loading configuration...");
    let config = load_project_config(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {}", config.name);

    let source = DuckDbRecordSource::new(config.input_path_in(project_dir));
    let renderer = HtmlChartRenderer::new().context("Failed to initialize the chart renderer")?;
    let mut reporter = ConsoleReporter::default();

    match run_pipeline(
        &source,
        &renderer,
        &mut reporter,
        &config,
        project_dir,
        stage,
    ) {
        Ok(RunResult { success: true, artifacts, .. }) => {
            println!(
                "\n✨ SUCCESS! {} artifact(s) written in {:.2?}",
                artifacts.len(),
                start.elapsed()
            );
            Ok(())
        }
        Ok(result) => {
            eprintln!("\n❌ FAILURE. {} artifact(s) failed.", result.errors.len());
            std::process::exit(1);
        }
        Err(e) => fail("CRITICAL PIPELINE ERROR", e),
    }
}

fn fail(label: &str, error: SkewError) -> ! {
    eprintln!("\n💥 {}: {}", label, error);
    eprintln!("{:?}", miette::Report::new(error));
    std::process::exit(1);
}
