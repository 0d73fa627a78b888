// skew-core/src/infrastructure/config/mod.rs

pub mod project;

pub use crate::domain::config::ProjectConfig;
pub use project::{CONFIG_CANDIDATES, load_project_config};
