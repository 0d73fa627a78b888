// skew/src/commands/analyze.rs
//
// USE CASE: load, aggregate, print and export the yearly summary.

use std::path::PathBuf;

use skew_core::application::Stage;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("📊 Analyzing dataset in {}", project_dir.display());
    super::execute_stage(&project_dir, Stage::Analyze)
}
