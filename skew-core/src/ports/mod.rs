// skew-core/src/ports/mod.rs

pub mod record_source;
pub mod renderer;
pub mod reporter;

pub use record_source::RecordSource;
pub use renderer::ChartRenderer;
pub use reporter::{ArtifactKind, RunEvent, RunReporter, SilentReporter};
