// skew/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod report;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug skew run ... to see the details.
    // Logs go to stderr so stdout stays the run report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { project_dir } => commands::run::execute(project_dir),
        Commands::Analyze { project_dir } => commands::analyze::execute(project_dir),
        Commands::Visualize { project_dir } => commands::visualize::execute(project_dir),
    }
}
