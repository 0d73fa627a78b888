// skew-core/src/infrastructure/render/mod.rs

pub mod html;
pub mod scene;

pub use html::HtmlChartRenderer;
