// skew-core/src/domain/chart/mod.rs

pub mod framing;
pub mod spec;

pub use framing::{FramedChart, FramingTechnique, Narrative, optimistic_chart, skeptical_chart};
pub use spec::{AxisRange, ChartSpec};
