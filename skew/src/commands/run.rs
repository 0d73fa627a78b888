// skew/src/commands/run.rs
//
// USE CASE: summary file and both charts in one pass.

use std::path::PathBuf;

use skew_core::application::Stage;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("🚀 Starting full run in {}", project_dir.display());
    super::execute_stage(&project_dir, Stage::Full)
}
