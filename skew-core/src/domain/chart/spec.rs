// skew-core/src/domain/chart/spec.rs
//
// Declarative description of one chart document. Built by the framing
// builders, consumed by a ChartRenderer, then dropped. Every number a
// renderer draws or prints is already in here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_zero_anchored(&self) -> bool {
        self.min == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: Title,
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    pub legend: Legend,
    pub panels: Vec<Panel>,
    /// Figure-level text placed in paper coordinates.
    pub notes: Vec<Note>,
}

impl ChartSpec {
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.panels.iter().flat_map(|p| p.series.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// Bold lead-in, e.g. "Rising Accountability:".
    pub lead: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Palette {
    pub paper: String,
    pub plot: String,
    pub grid: String,
    pub text: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            paper: "#f8f9fa".to_string(),
            plot: "white".to_string(),
            grid: "#ecf0f1".to_string(),
            text: "#2c3e50".to_string(),
        }
    }
}

/// Legend box anchor in paper coordinates (0..1, origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: Option<String>,
    /// Share of the plotting height given to this panel.
    pub weight: f64,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    pub reference_lines: Vec<ReferenceLine>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub range: AxisRange,
    pub tick_step: f64,
    pub tick_suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub kind: SeriesKind,
    pub points: Vec<Point>,
    pub hover: ValueFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesKind {
    Line(LineStyle),
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f64,
    pub dashed: bool,
    pub markers: Option<MarkerStyle>,
    /// Fill colour for the area between the line and y = 0.
    pub fill_to_zero: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub size: f64,
    pub outline: Option<String>,
}

/// How a value is shown in hover tooltips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueFormat {
    pub label: String,
    pub decimals: usize,
    pub suffix: String,
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> String {
        format!(
            "{}: {:.*}{}",
            self.label, self.decimals, value, self.suffix
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub color: String,
    pub dashed: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub color: String,
    pub size: f64,
    pub border: Option<String>,
    pub background: Option<String>,
}

impl TextStyle {
    pub fn colored(color: &str, size: f64) -> Self {
        Self {
            color: color.to_string(),
            size,
            border: None,
            background: None,
        }
    }

    pub fn boxed(mut self, border: &str, background: &str) -> Self {
        self.border = Some(border.to_string());
        self.background = Some(background.to_string());
        self
    }
}

/// Pixel offset from the anchor to the label; the arrow points back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arrow {
    pub dx: f64,
    pub dy: f64,
}

/// Text anchored to a data coordinate of one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub lines: Vec<TextRun>,
    pub style: TextStyle,
    pub arrow: Option<Arrow>,
    /// Vertical pixel shift of an arrowless label (positive is down).
    pub y_shift: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    End,
}

/// Text anchored in paper coordinates (0..1, origin bottom-left; may be
/// negative to sit below the plot area).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub lines: Vec<TextRun>,
    pub style: TextStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_format() {
        let fmt = ValueFormat {
            label: "Rate".to_string(),
            decimals: 1,
            suffix: "%".to_string(),
        };
        assert_eq!(fmt.format(35.123), "Rate: 35.1%");
    }

    #[test]
    fn test_axis_range() {
        assert!(AxisRange::new(0.0, 40.0).is_zero_anchored());
        assert!(!AxisRange::new(15.0, 37.0).is_zero_anchored());
        assert_eq!(AxisRange::new(15.0, 37.0).span(), 22.0);
    }
}
