// skew/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skew")]
#[command(about = "Two charts, one dataset: framing complaint substantiation rates", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Full run: yearly summary file plus both charts
    Run {
        /// Project directory (holds skew.yaml and the data)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📊 Loads and aggregates the dataset, prints and exports the summary
    Analyze {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🎭 Renders the optimistic and skeptical charts and discloses their framing
    Visualize {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let args = Cli::parse_from(["skew", "run"]);
        match args.command {
            Commands::Run { project_dir } => assert_eq!(project_dir.to_string_lossy(), "."),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_project_dir() {
        let args = Cli::parse_from(["skew", "visualize", "--project-dir", "/tmp/ccrb"]);
        match args.command {
            Commands::Visualize { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp/ccrb")
            }
            _ => panic!("Expected Visualize command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["skew", "publish"]).is_err());
    }
}
