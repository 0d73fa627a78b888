// skew-core/src/infrastructure/render/html.rs

// Renders a ChartSpec into one standalone HTML page: inline SVG for the
// figure, a few lines of inline script for hover and legend toggling.
// Nothing is fetched when the page is opened.

use chrono::Utc;
use minijinja::{Environment, context};

use crate::domain::chart::ChartSpec;
use crate::error::SkewError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::render::scene;
use crate::ports::renderer::ChartRenderer;

const TEMPLATE_NAME: &str = "chart.html";
const TEMPLATE: &str = include_str!("templates/chart.html");

pub struct HtmlChartRenderer {
    env: Environment<'static>,
}

impl HtmlChartRenderer {
    pub fn new() -> Result<Self, InfrastructureError> {
        let mut env = Environment::new();
        // The .html name turns on HTML auto-escaping for every interpolation.
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env })
    }
}

impl ChartRenderer for HtmlChartRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<String, SkewError> {
        let scene = scene::layout(chart);
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(InfrastructureError::TemplateError)?;
        let html = template
            .render(context! {
                scene => scene,
                version => env!("CARGO_PKG_VERSION"),
                generated_at => Utc::now().to_rfc3339(),
            })
            .map_err(InfrastructureError::TemplateError)?;
        Ok(html)
    }
}
