// skew-core/src/application/mod.rs

pub mod pipeline;

// `use skew_core::application::{run_pipeline, Stage};`
pub use pipeline::{ArtifactOutcome, RunResult, Stage, run_pipeline};
