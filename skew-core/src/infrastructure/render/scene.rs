// skew-core/src/infrastructure/render/scene.rs
//
// Pixel layout of a ChartSpec. Only projection happens here: data values are
// mapped to SVG coordinates, nothing is aggregated or fitted.

use serde::Serialize;

use crate::domain::chart::spec::{
    Annotation, Axis, ChartSpec, Note, Palette, Panel, Series, SeriesKind, TextAnchor,
    TextRun, TextStyle,
};

const MARGIN_TOP: f64 = 100.0;
const MARGIN_BOTTOM: f64 = 110.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 40.0;
const PANEL_GAP: f64 = 80.0;
const BAR_FILL: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Serialize)]
pub struct Scene {
    pub title_lead: String,
    pub title_text: String,
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    pub panels: Vec<PanelScene>,
    pub legend: LegendScene,
    pub notes: Vec<LabelScene>,
}

#[derive(Debug, Serialize)]
pub struct PanelScene {
    pub id: String,
    pub title: Option<String>,
    pub plot: Rect,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub x_title: String,
    pub y_title: String,
    pub bars: Vec<BarScene>,
    pub lines: Vec<LineScene>,
    pub reference_lines: Vec<ReferenceScene>,
    pub annotations: Vec<AnnotationScene>,
    pub hover: Vec<HoverColumn>,
}

#[derive(Debug, Serialize)]
pub struct Tick {
    pub pos: f64,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct BarScene {
    pub series: usize,
    pub rect: Rect,
    pub color: String,
    pub tip: String,
}

#[derive(Debug, Serialize)]
pub struct LineScene {
    pub series: usize,
    pub path: String,
    pub area: Option<String>,
    pub fill: Option<String>,
    pub color: String,
    pub width: f64,
    pub dash: Option<String>,
    pub markers: Vec<MarkerScene>,
}

#[derive(Debug, Serialize)]
pub struct MarkerScene {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub outline: Option<String>,
    pub tip: String,
}

#[derive(Debug, Serialize)]
pub struct ReferenceScene {
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
    pub color: String,
    pub dash: Option<String>,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct LabelScene {
    pub x: f64,
    pub y: f64,
    pub anchor: &'static str,
    pub lines: Vec<TextRun>,
    pub style: TextStyle,
    pub frame: Option<Rect>,
}

#[derive(Debug, Serialize)]
pub struct AnnotationScene {
    /// Arrow from the label towards the anchor, when present.
    pub arrow: Option<(f64, f64, f64, f64)>,
    pub label: LabelScene,
}

/// Invisible full-height strip answering hover for one x value.
#[derive(Debug, Serialize)]
pub struct HoverColumn {
    pub rect: Rect,
    pub heading: String,
    pub entries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LegendScene {
    pub x: f64,
    pub y: f64,
    pub items: Vec<LegendItem>,
}

#[derive(Debug, Serialize)]
pub struct LegendItem {
    pub series: usize,
    pub name: String,
    pub color: String,
    pub is_bar: bool,
    pub dash: Option<String>,
}

/// Linear map from data space to the plot rectangle (SVG y grows downward).
struct Projection {
    plot: Rect,
    x_min: f64,
    x_span: f64,
    y_min: f64,
    y_span: f64,
}

impl Projection {
    fn new(plot: Rect, panel: &Panel) -> Self {
        Self {
            plot,
            x_min: panel.x_axis.range.min,
            x_span: nonzero(panel.x_axis.range.span()),
            y_min: panel.y_axis.range.min,
            y_span: nonzero(panel.y_axis.range.span()),
        }
    }

    fn x(&self, v: f64) -> f64 {
        round2(self.plot.x + (v - self.x_min) / self.x_span * self.plot.w)
    }

    fn y(&self, v: f64) -> f64 {
        round2(self.plot.y + self.plot.h - (v - self.y_min) / self.y_span * self.plot.h)
    }

    fn x_unit(&self) -> f64 {
        self.plot.w / self.x_span
    }
}

pub fn layout(spec: &ChartSpec) -> Scene {
    let width = f64::from(spec.width);
    let height = f64::from(spec.height);
    let area = Rect {
        x: MARGIN_LEFT,
        y: MARGIN_TOP,
        w: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        h: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
    };

    let gaps = PANEL_GAP * spec.panels.len().saturating_sub(1) as f64;
    let usable = (area.h - gaps).max(1.0);
    let total_weight = nonzero(spec.panels.iter().map(|p| p.weight).sum());

    let mut panels = Vec::with_capacity(spec.panels.len());
    let mut legend_items = Vec::new();
    let mut series_offset = 0;
    let mut top = area.y;
    for (index, panel) in spec.panels.iter().enumerate() {
        let plot = Rect {
            x: area.x,
            y: round2(top),
            w: round2(area.w),
            h: round2(usable * panel.weight / total_weight),
        };
        top += plot.h + PANEL_GAP;

        for (i, series) in panel.series.iter().enumerate() {
            legend_items.push(LegendItem {
                series: series_offset + i,
                name: series.name.clone(),
                color: series.color.clone(),
                is_bar: matches!(series.kind, SeriesKind::Bar),
                dash: match &series.kind {
                    SeriesKind::Line(style) if style.dashed => Some(dash_pattern()),
                    _ => None,
                },
            });
        }

        panels.push(layout_panel(index, panel, plot, series_offset));
        series_offset += panel.series.len();
    }

    Scene {
        title_lead: spec.title.lead.clone(),
        title_text: spec.title.text.clone(),
        width: spec.width,
        height: spec.height,
        palette: spec.palette.clone(),
        panels,
        legend: LegendScene {
            x: paper_x(area, spec.legend.x),
            y: paper_y(area, spec.legend.y),
            items: legend_items,
        },
        notes: spec.notes.iter().map(|n| layout_note(area, n)).collect(),
    }
}

fn layout_panel(index: usize, panel: &Panel, plot: Rect, series_offset: usize) -> PanelScene {
    let proj = Projection::new(plot, panel);

    let mut bars = Vec::new();
    let mut lines = Vec::new();
    let bar_series: Vec<(usize, &Series)> = panel
        .series
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s.kind, SeriesKind::Bar))
        .collect();
    layout_bars(&proj, &bar_series, series_offset, &mut bars);

    for (i, series) in panel.series.iter().enumerate() {
        if let SeriesKind::Line(style) = &series.kind {
            let coords: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|p| (proj.x(p.x), proj.y(p.y)))
                .collect();
            let area = style.fill_to_zero.as_ref().and_then(|_| {
                let (first, last) = (coords.first()?, coords.last()?);
                let base = proj.y(0.0);
                Some(format!(
                    "{} L {:.2} {:.2} L {:.2} {:.2} Z",
                    polyline(&coords),
                    last.0,
                    base,
                    first.0,
                    base
                ))
            });
            let markers = match &style.markers {
                Some(marker) => series
                    .points
                    .iter()
                    .zip(&coords)
                    .map(|(p, &(cx, cy))| MarkerScene {
                        cx,
                        cy,
                        r: marker.size / 2.0,
                        outline: marker.outline.clone(),
                        tip: format!("{:.0} | {}", p.x, series.hover.format(p.y)),
                    })
                    .collect(),
                None => Vec::new(),
            };
            lines.push(LineScene {
                series: series_offset + i,
                path: polyline(&coords),
                area,
                fill: style.fill_to_zero.clone(),
                color: series.color.clone(),
                width: style.width,
                dash: style.dashed.then(dash_pattern),
                markers,
            });
        }
    }

    PanelScene {
        id: format!("panel-{}", index),
        title: panel.title.clone(),
        plot,
        x_ticks: ticks(&panel.x_axis, |v| proj.x(v)),
        y_ticks: ticks(&panel.y_axis, |v| proj.y(v)),
        x_title: panel.x_axis.title.clone(),
        y_title: panel.y_axis.title.clone(),
        bars,
        lines,
        reference_lines: panel
            .reference_lines
            .iter()
            .map(|r| ReferenceScene {
                y: proj.y(r.y),
                x1: plot.x,
                x2: round2(plot.x + plot.w),
                color: r.color.clone(),
                dash: r.dashed.then(dash_pattern),
                label: r.label.clone(),
            })
            .collect(),
        annotations: panel
            .annotations
            .iter()
            .map(|a| layout_annotation(&proj, a))
            .collect(),
        hover: hover_columns(&proj, panel),
    }
}

/// Bars sharing an x value are stacked in series order.
fn layout_bars(
    proj: &Projection,
    series: &[(usize, &Series)],
    series_offset: usize,
    out: &mut Vec<BarScene>,
) {
    let slot = proj.x_unit() * BAR_FILL;

    // Running stack height per x value, keyed by the bit pattern of x.
    let mut stacks: Vec<(u64, f64)> = Vec::new();
    for (i, s) in series {
        for p in &s.points {
            let key = p.x.to_bits();
            let base = match stacks.iter_mut().find(|(k, _)| *k == key) {
                Some((_, height)) => {
                    let base = *height;
                    *height += p.y;
                    base
                }
                None => {
                    stacks.push((key, p.y));
                    0.0
                }
            };
            let left = proj.x(p.x) - slot / 2.0;
            let (top, bottom) = (proj.y(base + p.y), proj.y(base));
            out.push(BarScene {
                series: series_offset + i,
                rect: Rect {
                    x: round2(left),
                    y: top,
                    w: round2(slot),
                    h: round2((bottom - top).max(0.0)),
                },
                color: s.color.clone(),
                tip: format!("{:.0} | {}", p.x, s.hover.format(p.y)),
            });
        }
    }
}

fn layout_annotation(proj: &Projection, annotation: &Annotation) -> AnnotationScene {
    let (ax, ay) = (proj.x(annotation.x), proj.y(annotation.y));
    let (tx, ty) = match annotation.arrow {
        Some(arrow) => (ax + arrow.dx, ay + arrow.dy),
        None => (ax, ay + annotation.y_shift),
    };
    let label = label(
        round2(tx),
        round2(ty),
        "middle",
        &annotation.lines,
        &annotation.style,
    );
    AnnotationScene {
        arrow: annotation.arrow.map(|_| (round2(tx), round2(ty), ax, ay)),
        label,
    }
}

fn layout_note(area: Rect, note: &Note) -> LabelScene {
    let anchor = match note.anchor {
        TextAnchor::Start => "start",
        TextAnchor::End => "end",
    };
    label(
        paper_x(area, note.x),
        paper_y(area, note.y),
        anchor,
        &note.lines,
        &note.style,
    )
}

/// Text block centred vertically on `y`, with an estimated frame when boxed.
fn label(x: f64, y: f64, anchor: &'static str, lines: &[TextRun], style: &TextStyle) -> LabelScene {
    let line_height = style.size * 1.3;
    let longest = lines
        .iter()
        .map(|l| l.text.chars().count())
        .max()
        .unwrap_or(0) as f64;
    let text_w = longest * style.size * 0.55;
    let text_h = line_height * lines.len() as f64;
    let first_baseline = y - text_h / 2.0 + style.size;

    let frame = style.border.as_ref().map(|_| {
        let left = match anchor {
            "start" => x,
            "end" => x - text_w,
            _ => x - text_w / 2.0,
        };
        Rect {
            x: round2(left - 6.0),
            y: round2(y - text_h / 2.0 - 4.0),
            w: round2(text_w + 12.0),
            h: round2(text_h + 8.0),
        }
    });

    LabelScene {
        x,
        y: round2(first_baseline),
        anchor,
        lines: lines.to_vec(),
        style: style.clone(),
        frame,
    }
}

fn hover_columns(proj: &Projection, panel: &Panel) -> Vec<HoverColumn> {
    let mut xs: Vec<f64> = panel
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.x))
        .collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();

    let unit = proj.x_unit();
    xs.into_iter()
        .map(|x| HoverColumn {
            rect: Rect {
                x: round2(proj.x(x) - unit / 2.0),
                y: proj.plot.y,
                w: round2(unit),
                h: proj.plot.h,
            },
            heading: format!("{:.0}", x),
            entries: panel
                .series
                .iter()
                .filter_map(|s| {
                    s.points
                        .iter()
                        .find(|p| p.x == x)
                        .map(|p| s.hover.format(p.y))
                })
                .collect(),
        })
        .collect()
}

fn ticks(axis: &Axis, project: impl Fn(f64) -> f64) -> Vec<Tick> {
    let step = if axis.tick_step > 0.0 { axis.tick_step } else { 1.0 };
    let mut value = (axis.range.min / step).ceil() * step;
    let mut out = Vec::new();
    while value <= axis.range.max + step * 1e-9 {
        out.push(Tick {
            pos: project(value),
            label: format!("{:.0}{}", value, axis.tick_suffix),
        });
        value += step;
    }
    out
}

fn polyline(coords: &[(f64, f64)]) -> String {
    coords
        .iter()
        .enumerate()
        .map(|(i, (x, y))| format!("{} {:.2} {:.2}", if i == 0 { "M" } else { "L" }, x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn paper_x(area: Rect, x: f64) -> f64 {
    round2(area.x + x * area.w)
}

fn paper_y(area: Rect, y: f64) -> f64 {
    round2(area.y + (1.0 - y) * area.h)
}

fn dash_pattern() -> String {
    "8 5".to_string()
}

fn nonzero(v: f64) -> f64 {
    if v == 0.0 { 1.0 } else { v }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
