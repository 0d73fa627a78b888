// skew-core/src/domain/chart/framing.rs
//
// Pure builders: view + chart config in, ChartSpec + disclosure out.
// All framing decisions (ranges, slices, overlays, wording) live here so
// they can be tested without touching a renderer.

use serde::Serialize;
use std::fmt;

use crate::domain::chart::spec::{
    Annotation, Arrow, Axis, AxisRange, ChartSpec, Legend, LineStyle, MarkerStyle,
    Note, Palette, Panel, Point, ReferenceLine, Series, SeriesKind, TextAnchor, TextRun,
    TextStyle, Title, ValueFormat,
};
use crate::domain::config::{OptimisticChartConfig, SkepticalChartConfig};
use crate::domain::summary::YearRange;
use crate::domain::views::{OptimisticView, SkepticalView};

const CHART_WIDTH: u32 = 1100;
const MUTED: &str = "#7f8c8d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Narrative {
    /// "Accountability has improved since 2010."
    Optimistic,
    /// "Accountability has not improved."
    Skeptical,
}

impl Narrative {
    pub fn stance(&self) -> &'static str {
        match self {
            Narrative::Optimistic => "FOR",
            Narrative::Skeptical => "AGAINST",
        }
    }
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narrative::Optimistic => f.write_str("optimistic"),
            Narrative::Skeptical => f.write_str("skeptical"),
        }
    }
}

/// One disclosed framing choice and what it does to the reader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramingTechnique {
    pub name: String,
    pub effect: String,
}

impl FramingTechnique {
    fn new(name: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effect: effect.into(),
        }
    }
}

impl fmt::Display for FramingTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.effect)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramedChart {
    pub narrative: Narrative,
    pub spec: ChartSpec,
    pub techniques: Vec<FramingTechnique>,
}

pub fn optimistic_chart(
    view: &OptimisticView,
    config: &OptimisticChartConfig,
    source_label: &str,
) -> FramedChart {
    const GREEN: &str = "#2ecc71";
    const DARK_GREEN: &str = "#27ae60";
    const MINT: &str = "#e8f8f5";

    let span = view.span().unwrap_or(YearRange {
        start: view.start_year,
        end: view.start_year,
    });

    let rate_points: Vec<Point> = view
        .points
        .iter()
        .map(|p| Point {
            x: f64::from(p.year),
            y: p.substantiation_rate,
        })
        .collect();
    let trend_points: Vec<Point> = view
        .points
        .iter()
        .map(|p| Point {
            x: f64::from(p.year),
            y: p.trend,
        })
        .collect();

    let mut annotations = Vec::new();
    if let Some(peak) = view.peak() {
        annotations.push(Annotation {
            x: f64::from(peak.year()),
            y: peak.substantiation_rate(),
            lines: vec![
                TextRun::bold(format!("Record High: {:.0}%", peak.substantiation_rate())),
                TextRun::plain("Accountability Peak"),
            ],
            style: TextStyle::colored(DARK_GREEN, 14.0).boxed(DARK_GREEN, MINT),
            arrow: Some(Arrow { dx: -80.0, dy: -60.0 }),
            y_shift: 0.0,
        });
    }
    let endpoints = view
        .first()
        .zip(view.last())
        .filter(|(first, last)| first.year() != last.year());
    if let Some((first, last)) = endpoints {
        annotations.push(Annotation {
            x: f64::from(first.year()),
            y: first.substantiation_rate(),
            lines: vec![TextRun::plain(format!(
                "{}: {:.1}%",
                first.year(),
                first.substantiation_rate()
            ))],
            style: TextStyle::colored("#95a5a6", 11.0),
            arrow: None,
            y_shift: 20.0,
        });

        let mut lines = vec![TextRun::bold(format!(
            "{}: {:.1}%",
            last.year(),
            last.substantiation_rate()
        ))];
        if let Some(change) = view.relative_change() {
            let direction = if change >= 0.0 { "increase" } else { "change" };
            lines.push(TextRun::italic(format!("{:+.0}% {}", change, direction)));
        }
        annotations.push(Annotation {
            x: f64::from(last.year()),
            y: last.substantiation_rate(),
            lines,
            style: TextStyle::colored(DARK_GREEN, 12.0).boxed(DARK_GREEN, MINT),
            arrow: Some(Arrow { dx: 40.0, dy: -40.0 }),
            y_shift: 0.0,
        });
    }

    let panel = Panel {
        title: None,
        weight: 1.0,
        x_axis: year_axis(span, 1.0),
        y_axis: rate_axis(config.rate_axis),
        series: vec![
            Series {
                name: "Substantiation Rate".to_string(),
                color: GREEN.to_string(),
                kind: SeriesKind::Line(LineStyle {
                    width: 4.0,
                    dashed: false,
                    markers: Some(MarkerStyle {
                        size: 12.0,
                        outline: Some("white".to_string()),
                    }),
                    fill_to_zero: Some("rgba(46, 204, 113, 0.3)".to_string()),
                }),
                points: rate_points,
                hover: percent_format("Substantiation Rate"),
            },
            Series {
                name: "Upward Trend".to_string(),
                color: DARK_GREEN.to_string(),
                kind: SeriesKind::Line(LineStyle {
                    width: 3.0,
                    dashed: true,
                    markers: None,
                    fill_to_zero: None,
                }),
                points: trend_points,
                hover: percent_format("Trend"),
            },
        ],
        reference_lines: Vec::new(),
        annotations,
    };

    let spec = ChartSpec {
        title: Title {
            lead: "Rising Accountability:".to_string(),
            text: "NYPD Complaint Substantiation Rates Show Major Improvement".to_string(),
        },
        width: CHART_WIDTH,
        height: config.height,
        palette: Palette::default(),
        legend: Legend { x: 0.02, y: 0.98 },
        panels: vec![panel],
        notes: vec![Note {
            x: 0.0,
            y: -0.12,
            anchor: TextAnchor::Start,
            lines: vec![TextRun::italic(format!(
                "Source: {} Data, {}",
                source_label, span
            ))],
            style: TextStyle::colored(MUTED, 10.0),
        }],
    };

    let mut techniques = Vec::new();
    if !config.rate_axis.is_zero_anchored() {
        techniques.push(FramingTechnique::new(
            format!(
                "Truncated Y-axis (starts at {}%, not 0%)",
                config.rate_axis.min
            ),
            "makes growth look steeper",
        ));
    }
    techniques.extend([
        FramingTechnique::new(
            format!("Cherry-picked timeframe ({} only)", span),
            "hides historical context",
        ),
        FramingTechnique::new("Area fill under curve", "exaggerates visual impact"),
        FramingTechnique::new(
            format!("Polynomial trend line (degree {})", view.fit.degree()),
            "suggests continuous improvement",
        ),
        FramingTechnique::new(
            "Emphatic language: 'Record High', 'Major Improvement'",
            "primes the reader to see progress",
        ),
    ]);

    FramedChart {
        narrative: Narrative::Optimistic,
        spec,
        techniques,
    }
}

pub fn skeptical_chart(
    view: &SkepticalView,
    config: &SkepticalChartConfig,
    source_label: &str,
) -> FramedChart {
    const RED: &str = "#e74c3c";
    const DARK_RED: &str = "#c0392b";
    const GREY: &str = "#95a5a6";

    let span = view.span().unwrap_or(YearRange {
        start: 0,
        end: 0,
    });
    // Years with data, not calendar years in the span.
    let years = view.points.len();

    let rate_points: Vec<Point> = view
        .points
        .iter()
        .map(|p| Point {
            x: f64::from(p.year),
            y: p.substantiation_rate,
        })
        .collect();

    let drop = view.latest_drop();
    let mut rate_annotations = Vec::new();
    if let Some(drop) = drop {
        rate_annotations.push(Annotation {
            x: f64::from(drop.year),
            y: drop.rate,
            lines: vec![
                TextRun::bold(format!("{}: Dropped to {:.0}%", drop.year, drop.rate)),
                TextRun::plain("Progress reversed"),
            ],
            style: TextStyle::colored(DARK_RED, 11.0).boxed(RED, "#fadbd8"),
            arrow: Some(Arrow { dx: 50.0, dy: 40.0 }),
            y_shift: 0.0,
        });
    }

    let rate_panel = Panel {
        title: Some("Substantiation Rates: High Volatility, No Consistent Improvement".to_string()),
        weight: 0.5,
        x_axis: year_axis(span, 2.0),
        y_axis: rate_axis(config.rate_axis),
        series: vec![Series {
            name: "Substantiation Rate".to_string(),
            color: RED.to_string(),
            kind: SeriesKind::Line(LineStyle {
                width: 3.0,
                dashed: false,
                markers: Some(MarkerStyle {
                    size: 8.0,
                    outline: None,
                }),
                fill_to_zero: None,
            }),
            points: rate_points,
            hover: percent_format("Rate"),
        }],
        reference_lines: vec![ReferenceLine {
            y: view.mean_rate,
            color: GREY.to_string(),
            dashed: true,
            label: format!("{}-Year Average: {:.1}%", years, view.mean_rate),
        }],
        annotations: rate_annotations,
    };

    let count_max = nice_ceiling(view.max_total() as f64 * 1.05);
    let count_panel = Panel {
        title: Some("The Reality: Most Complaints Still Go Unsubstantiated".to_string()),
        weight: 0.5,
        x_axis: year_axis(span, 2.0),
        y_axis: Axis {
            title: "Number of Allegations".to_string(),
            range: AxisRange::new(0.0, count_max),
            tick_step: nice_step(count_max, 6.0),
            tick_suffix: String::new(),
        },
        series: vec![
            Series {
                name: "Unsubstantiated/Exonerated".to_string(),
                color: GREY.to_string(),
                kind: SeriesKind::Bar,
                points: view
                    .points
                    .iter()
                    .map(|p| Point {
                        x: f64::from(p.year),
                        y: p.unsubstantiated_count as f64,
                    })
                    .collect(),
                hover: count_format("Unsubstantiated"),
            },
            Series {
                name: "Substantiated".to_string(),
                color: "#3498db".to_string(),
                kind: SeriesKind::Bar,
                points: view
                    .points
                    .iter()
                    .map(|p| Point {
                        x: f64::from(p.year),
                        y: p.substantiated_count as f64,
                    })
                    .collect(),
                hover: count_format("Substantiated"),
            },
        ],
        reference_lines: Vec::new(),
        annotations: Vec::new(),
    };

    let mut notes = vec![Note {
        x: 0.0,
        y: -0.08,
        anchor: TextAnchor::Start,
        lines: vec![TextRun::italic(format!(
            "Source: {} Complete Dataset, {} | Note: data after {} excluded as incomplete",
            source_label, span, span.end
        ))],
        style: TextStyle::colored(MUTED, 10.0),
    }];
    if let Some(peak) = view.peak() {
        notes.push(Note {
            x: 0.98,
            y: 0.52,
            anchor: TextAnchor::End,
            lines: vec![
                TextRun::italic(format!(
                    "Even at 'record high', {:.0}% of",
                    100.0 - peak.substantiation_rate
                )),
                TextRun::italic("complaints go unsubstantiated"),
            ],
            style: TextStyle::colored(MUTED, 11.0).boxed("#bdc3c7", "rgba(255,255,255,0.8)"),
        });
    }

    let spec = ChartSpec {
        title: Title {
            lead: "The Accountability Illusion:".to_string(),
            text: "NYPD Complaint Substantiation Remains Inconsistent".to_string(),
        },
        width: CHART_WIDTH,
        height: config.height,
        palette: Palette::default(),
        legend: Legend { x: 0.02, y: 0.48 },
        panels: vec![rate_panel, count_panel],
        notes,
    };

    let axis_technique = if config.rate_axis.is_zero_anchored() {
        FramingTechnique::new("Y-axis starts at 0 (earnest)", "shows true proportions")
    } else {
        FramingTechnique::new(
            format!("Y-axis starts at {}%", config.rate_axis.min),
            "flattens the visible change",
        )
    };
    let mut techniques = vec![
        axis_technique,
        FramingTechnique::new(
            format!("Full {}-year view ({})", years, span),
            "reveals volatility and inconsistency",
        ),
        FramingTechnique::new("Stacked bars showing raw numbers", "emphasizes scale"),
    ];
    if let Some(drop) = drop {
        techniques.push(FramingTechnique::new(
            format!("Highlighting the {} drop", drop.year),
            "contradicts 'improvement' narrative",
        ));
    }
    techniques.extend([
        FramingTechnique::new(
            format!(
                "Unweighted average line ({:.1}%, vs {:.1}% pooled over all allegations)",
                view.mean_rate, view.weighted_rate
            ),
            "every year counts the same regardless of volume",
        ),
        FramingTechnique::new(
            "Language: 'Illusion', 'Inconsistent'",
            "frames skeptically",
        ),
    ]);

    FramedChart {
        narrative: Narrative::Skeptical,
        spec,
        techniques,
    }
}

fn year_axis(span: YearRange, tick_step: f64) -> Axis {
    Axis {
        title: "Year".to_string(),
        range: AxisRange::new(f64::from(span.start) - 0.5, f64::from(span.end) + 0.5),
        tick_step,
        tick_suffix: String::new(),
    }
}

fn rate_axis(range: AxisRange) -> Axis {
    Axis {
        title: "Substantiation Rate (%)".to_string(),
        range,
        tick_step: nice_step(range.span(), 8.0),
        tick_suffix: "%".to_string(),
    }
}

fn percent_format(label: &str) -> ValueFormat {
    ValueFormat {
        label: label.to_string(),
        decimals: 1,
        suffix: "%".to_string(),
    }
}

fn count_format(label: &str) -> ValueFormat {
    ValueFormat {
        label: label.to_string(),
        decimals: 0,
        suffix: String::new(),
    }
}

/// 1, 2 or 5 times a power of ten, giving about `target` ticks over `span`.
fn nice_step(span: f64, target: f64) -> f64 {
    if span <= 0.0 || !span.is_finite() {
        return 1.0;
    }
    let raw = span / target;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    step.max(1.0)
}

/// Smallest multiple of a nice step that is at least `value` (minimum 1).
fn nice_ceiling(value: f64) -> f64 {
    if value <= 1.0 {
        return 1.0;
    }
    let step = nice_step(value, 5.0);
    (value / step).ceil() * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::{SummaryTable, YearlySummary};
    use anyhow::{Context, Result};

    fn table(rows: &[(i32, u64, u64)]) -> SummaryTable {
        SummaryTable::from_rows(
            rows.iter()
                .map(|&(y, t, s)| YearlySummary::from_counts(y, t, s)),
        )
    }

    fn decade() -> SummaryTable {
        table(&[
            (2000, 5000, 900),
            (2005, 6000, 800),
            (2010, 4000, 700),
            (2013, 4000, 1000),
            (2015, 3000, 1054),
            (2017, 3000, 759),
            (2019, 2500, 773),
        ])
    }

    #[test]
    fn test_optimistic_axis_is_truncated() -> Result<()> {
        let view = OptimisticView::select(&decade(), 2010)?;
        let chart = optimistic_chart(&view, &OptimisticChartConfig::default(), "CCRB");

        let rate = &chart.spec.panels[0].y_axis;
        assert_eq!(rate.range, AxisRange::new(15.0, 37.0));
        assert_eq!(rate.tick_suffix, "%");
        assert_eq!(chart.spec.panels[0].x_axis.tick_step, 1.0);
        assert_eq!(chart.spec.height, 600);
        assert!(chart.techniques[0].name.contains("starts at 15%"));
        Ok(())
    }

    #[test]
    fn test_optimistic_plots_only_view_numbers() -> Result<()> {
        let view = OptimisticView::select(&decade(), 2010)?;
        let chart = optimistic_chart(&view, &OptimisticChartConfig::default(), "CCRB");

        let series: Vec<&Series> = chart.spec.series().collect();
        assert_eq!(series.len(), 2);
        let rates: Vec<f64> = series[0].points.iter().map(|p| p.y).collect();
        let expected: Vec<f64> = view.points.iter().map(|p| p.substantiation_rate).collect();
        assert_eq!(rates, expected);
        let trend: Vec<f64> = series[1].points.iter().map(|p| p.y).collect();
        let expected: Vec<f64> = view.points.iter().map(|p| p.trend).collect();
        assert_eq!(trend, expected);
        assert!(matches!(&series[0].kind, SeriesKind::Line(l) if l.fill_to_zero.is_some()));
        assert!(matches!(&series[1].kind, SeriesKind::Line(l) if l.dashed));
        Ok(())
    }

    #[test]
    fn test_optimistic_annotations_follow_the_data() -> Result<()> {
        let view = OptimisticView::select(&decade(), 2010)?;
        let chart = optimistic_chart(&view, &OptimisticChartConfig::default(), "CCRB");
        let annotations = &chart.spec.panels[0].annotations;

        let peak = annotations.first().context("no peak annotation")?;
        assert_eq!(peak.x, 2015.0);
        assert_eq!(peak.lines[0].text, "Record High: 35%");

        let last = annotations.last().context("no last annotation")?;
        assert_eq!(last.x, 2019.0);
        assert_eq!(last.lines[0].text, "2019: 30.9%");
        assert_eq!(last.lines[1].text, "+77% increase");
        Ok(())
    }

    #[test]
    fn test_skeptical_layout() -> Result<()> {
        let view = SkepticalView::select(&decade())?;
        let chart = skeptical_chart(&view, &SkepticalChartConfig::default(), "CCRB");

        assert_eq!(chart.spec.panels.len(), 2);
        let rate_panel = &chart.spec.panels[0];
        assert!(rate_panel.y_axis.range.is_zero_anchored());
        assert_eq!(rate_panel.y_axis.range.max, 40.0);
        assert_eq!(rate_panel.x_axis.tick_step, 2.0);

        let mean = rate_panel.reference_lines.first().context("no mean line")?;
        assert_eq!(mean.y, view.mean_rate);
        assert_eq!(mean.label, "7-Year Average: 23.6%");

        let volume = &chart.spec.panels[1];
        assert!(volume.series.iter().all(|s| matches!(s.kind, SeriesKind::Bar)));
        assert_eq!(volume.series.len(), 2);
        assert!(volume.y_axis.range.max >= view.max_total() as f64);
        assert!(chart.spec.series().all(|s| !s.name.contains("Trend")));
        Ok(())
    }

    #[test]
    fn test_skeptical_drop_annotation_and_disclosure() -> Result<()> {
        let view = SkepticalView::select(&decade())?;
        let chart = skeptical_chart(&view, &SkepticalChartConfig::default(), "CCRB");

        let drop = chart.spec.panels[0]
            .annotations
            .first()
            .context("no drop annotation")?;
        assert_eq!(drop.x, 2017.0);
        assert_eq!(drop.lines[0].text, "2017: Dropped to 25%");
        assert!(
            chart
                .techniques
                .iter()
                .any(|t| t.name == "Highlighting the 2017 drop")
        );
        Ok(())
    }

    #[test]
    fn test_gapped_years_counted_once() -> Result<()> {
        let view = SkepticalView::select(&decade())?;
        let chart = skeptical_chart(&view, &SkepticalChartConfig::default(), "CCRB");

        let mean = chart.spec.panels[0]
            .reference_lines
            .first()
            .context("no mean line")?;
        assert!(mean.label.starts_with("7-Year Average"));
        assert!(
            chart
                .techniques
                .iter()
                .any(|t| t.name == "Full 7-year view (2000-2019)")
        );
        Ok(())
    }

    #[test]
    fn test_disclosure_tracks_config() -> Result<()> {
        let view = OptimisticView::select(&decade(), 2010)?;
        let config = OptimisticChartConfig {
            rate_axis: AxisRange::new(0.0, 40.0),
            ..OptimisticChartConfig::default()
        };
        let chart = optimistic_chart(&view, &config, "CCRB");
        assert!(chart.techniques.iter().all(|t| !t.name.contains("Truncated")));
        Ok(())
    }

    #[test]
    fn test_nice_numbers() {
        assert_eq!(nice_step(22.0, 8.0), 5.0);
        assert_eq!(nice_step(40.0, 8.0), 5.0);
        assert_eq!(nice_step(7000.0, 6.0), 2000.0);
        assert_eq!(nice_ceiling(6300.0), 8000.0);
        assert_eq!(nice_ceiling(0.0), 1.0);
    }

    #[test]
    fn test_disclosure_snapshot() -> Result<()> {
        let t = decade();
        let optimistic = optimistic_chart(
            &OptimisticView::select(&t, 2010)?,
            &OptimisticChartConfig::default(),
            "CCRB",
        );
        let skeptical = skeptical_chart(
            &SkepticalView::select(&t)?,
            &SkepticalChartConfig::default(),
            "CCRB",
        );
        let text: Vec<String> = [optimistic, skeptical]
            .iter()
            .flat_map(|c| {
                std::iter::once(format!("{}:", c.narrative.stance()))
                    .chain(c.techniques.iter().map(|t| format!("  - {}", t)))
            })
            .collect();
        insta::assert_snapshot!("framing_disclosure", text.join("\n"));
        Ok(())
    }
}
