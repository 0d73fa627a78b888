// skew/src/commands/visualize.rs
//
// USE CASE: render both narratives and disclose how each one frames the data.

use std::path::PathBuf;

use skew_core::application::Stage;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    println!("🎭 Rendering both narratives for {}", project_dir.display());
    super::execute_stage(&project_dir, Stage::Visualize)
}
