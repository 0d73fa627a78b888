// skew-core/src/ports/renderer.rs

use crate::domain::chart::ChartSpec;
use crate::error::SkewError;

/// Turns a chart description into a standalone document.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<String, SkewError>;
}
