// skew-core/src/domain/views.rs
//
// The two narrative selections over one yearly table. Neither view filters
// beyond what is documented on it: callers decide the analysis range.

use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::summary::{SummaryTable, YearRange, YearlySummary};
use crate::domain::trend::PolynomialFit;

pub const TREND_DEGREE: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub substantiation_rate: f64,
    pub trend: f64,
}

/// Years from `start_year` onward with a fitted degree-2 trend overlay.
#[derive(Debug, Clone, Serialize)]
pub struct OptimisticView {
    pub start_year: i32,
    pub table: SummaryTable,
    pub fit: PolynomialFit,
    pub points: Vec<TrendPoint>,
}

impl OptimisticView {
    pub fn select(table: &SummaryTable, start_year: i32) -> Result<Self, DomainError> {
        let selected = table.from_year(start_year);
        let empty = || DomainError::EmptySelection {
            selection: format!("years >= {}", start_year),
        };

        let samples: Vec<(f64, f64)> = selected
            .iter()
            .map(|r| (f64::from(r.year()), r.substantiation_rate()))
            .collect();
        let fit = PolynomialFit::fit(&samples, TREND_DEGREE).ok_or_else(empty)?;

        let points = selected
            .iter()
            .map(|r| TrendPoint {
                year: r.year(),
                substantiation_rate: r.substantiation_rate(),
                trend: fit.evaluate(f64::from(r.year())),
            })
            .collect();

        Ok(Self {
            start_year,
            table: selected,
            fit,
            points,
        })
    }

    pub fn span(&self) -> Option<YearRange> {
        self.table.span()
    }

    /// Row with the highest rate; the earliest year wins ties.
    pub fn peak(&self) -> Option<&YearlySummary> {
        self.table.iter().fold(None, |best, row| match best {
            Some(b) if b.substantiation_rate() >= row.substantiation_rate() => Some(b),
            _ => Some(row),
        })
    }

    pub fn first(&self) -> Option<&YearlySummary> {
        self.table.rows().first()
    }

    pub fn last(&self) -> Option<&YearlySummary> {
        self.table.rows().last()
    }

    /// Relative change of the rate from first to last year, in percent.
    /// `None` when the first rate is zero or there is a single year.
    pub fn relative_change(&self) -> Option<f64> {
        let (first, last) = (self.first()?, self.last()?);
        if first.year() == last.year() || first.substantiation_rate() == 0.0 {
            return None;
        }
        Some(
            (last.substantiation_rate() - first.substantiation_rate())
                / first.substantiation_rate()
                * 100.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub year: i32,
    pub substantiation_rate: f64,
    pub substantiated_count: u64,
    pub unsubstantiated_count: u64,
}

/// A year-over-year decrease of the rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateDrop {
    pub from_year: i32,
    pub year: i32,
    pub previous_rate: f64,
    pub rate: f64,
}

/// The whole supplied range with volumes and an unweighted mean reference.
#[derive(Debug, Clone, Serialize)]
pub struct SkepticalView {
    pub table: SummaryTable,
    pub points: Vec<VolumePoint>,
    /// Arithmetic mean of the yearly rates; every year weighs the same.
    pub mean_rate: f64,
    /// Pooled substantiated / total ratio, in percent. Reported, never plotted.
    pub weighted_rate: f64,
}

impl SkepticalView {
    pub fn select(table: &SummaryTable) -> Result<Self, DomainError> {
        if table.is_empty() {
            return Err(DomainError::EmptySelection {
                selection: "the full range".to_string(),
            });
        }

        let points: Vec<VolumePoint> = table
            .iter()
            .map(|r| VolumePoint {
                year: r.year(),
                substantiation_rate: r.substantiation_rate(),
                substantiated_count: r.substantiated_count(),
                unsubstantiated_count: r.unsubstantiated_count(),
            })
            .collect();

        let mean_rate =
            points.iter().map(|p| p.substantiation_rate).sum::<f64>() / points.len() as f64;
        let weighted_rate =
            table.total_substantiated() as f64 / table.total_allegations() as f64 * 100.0;

        Ok(Self {
            table: table.clone(),
            points,
            mean_rate,
            weighted_rate,
        })
    }

    pub fn span(&self) -> Option<YearRange> {
        self.table.span()
    }

    /// Most recent year whose rate fell below the previous row's.
    pub fn latest_drop(&self) -> Option<RateDrop> {
        self.points
            .windows(2)
            .rev()
            .find(|w| w[1].substantiation_rate < w[0].substantiation_rate)
            .map(|w| RateDrop {
                from_year: w[0].year,
                year: w[1].year,
                previous_rate: w[0].substantiation_rate,
                rate: w[1].substantiation_rate,
            })
    }

    pub fn peak(&self) -> Option<&VolumePoint> {
        self.points.iter().fold(None, |best, p| match best {
            Some(b) if b.substantiation_rate >= p.substantiation_rate => Some(b),
            _ => Some(p),
        })
    }

    /// Largest stacked bar height.
    pub fn max_total(&self) -> u64 {
        self.points
            .iter()
            .map(|p| p.substantiated_count + p.unsubstantiated_count)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    fn table(rows: &[(i32, u64, u64)]) -> SummaryTable {
        SummaryTable::from_rows(
            rows.iter()
                .map(|&(y, t, s)| YearlySummary::from_counts(y, t, s)),
        )
    }

    #[test]
    fn test_optimistic_range_starts_at_bound() -> Result<()> {
        let t = table(&[(2000, 10, 1), (2009, 10, 2), (2010, 10, 3), (2019, 10, 4)]);
        let view = OptimisticView::select(&t, 2010)?;
        let span = view.span().context("empty view")?;
        assert_eq!((span.start, span.end), (2010, 2019));
        assert_eq!(view.points.len(), 2);
        Ok(())
    }

    #[test]
    fn test_optimistic_has_no_upper_bound() -> Result<()> {
        let t = table(&[(2010, 10, 3), (2020, 10, 4), (2021, 10, 5)]);
        let view = OptimisticView::select(&t, 2010)?;
        assert_eq!(view.span().map(|s| s.end), Some(2021));
        Ok(())
    }

    #[test]
    fn test_optimistic_empty_selection() {
        let t = table(&[(2001, 10, 3)]);
        assert!(matches!(
            OptimisticView::select(&t, 2010),
            Err(DomainError::EmptySelection { .. })
        ));
    }

    #[test]
    fn test_optimistic_trend_and_markers() -> Result<()> {
        let t = table(&[(2010, 200, 35), (2012, 100, 24), (2015, 100, 35), (2019, 100, 31)]);
        let view = OptimisticView::select(&t, 2010)?;

        let peak = view.peak().context("no peak")?;
        assert_eq!(peak.year(), 2015);
        let change = view.relative_change().context("no change")?;
        // 17.5% -> 31% is +77.1%
        assert!((change - (31.0 - 17.5) / 17.5 * 100.0).abs() < 1e-9);

        for p in &view.points {
            assert!((p.trend - view.fit.evaluate(f64::from(p.year))).abs() < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_skeptical_keeps_full_range() -> Result<()> {
        let t = table(&[(2000, 10, 1), (2010, 10, 3), (2019, 10, 4)]);
        let skeptical = SkepticalView::select(&t)?;
        let optimistic = OptimisticView::select(&t, 2010)?;

        let s = skeptical.span().context("empty")?;
        let o = optimistic.span().context("empty")?;
        assert_eq!((s.start, s.end), (2000, 2019));
        assert!(s.start <= o.start && s.end >= o.end);
        Ok(())
    }

    #[test]
    fn test_unweighted_mean_differs_from_weighted_ratio() -> Result<()> {
        let t = table(&[(2001, 10, 5), (2002, 1000, 100)]);
        let view = SkepticalView::select(&t)?;
        assert!((view.mean_rate - 30.0).abs() < 1e-9);
        assert!((view.weighted_rate - 105.0 / 1010.0 * 100.0).abs() < 1e-9);
        assert!((view.mean_rate - view.weighted_rate).abs() > 19.0);
        Ok(())
    }

    #[test]
    fn test_unsubstantiated_column() -> Result<()> {
        let t = table(&[(2005, 120, 30)]);
        let view = SkepticalView::select(&t)?;
        assert_eq!(view.points[0].unsubstantiated_count, 90);
        assert_eq!(view.points[0].substantiated_count, 30);
        Ok(())
    }

    #[test]
    fn test_latest_drop_picks_most_recent_decline() -> Result<()> {
        let t = table(&[
            (2014, 100, 30),
            (2015, 100, 20),
            (2016, 100, 35),
            (2017, 100, 25),
            (2018, 100, 28),
        ]);
        let view = SkepticalView::select(&t)?;
        let drop = view.latest_drop().context("no drop")?;
        assert_eq!((drop.from_year, drop.year), (2016, 2017));
        assert_eq!(view.max_total(), 100);
        assert_eq!(view.peak().map(|p| p.year), Some(2016));
        Ok(())
    }

    #[test]
    fn test_monotonic_series_has_no_drop() -> Result<()> {
        let t = table(&[(2014, 100, 10), (2015, 100, 20)]);
        assert!(SkepticalView::select(&t)?.latest_drop().is_none());
        Ok(())
    }

    #[test]
    fn test_three_year_scenario() -> Result<()> {
        let t = table(&[(2010, 100, 20), (2011, 100, 25), (2012, 100, 15)]);
        let skeptical = SkepticalView::select(&t)?;
        assert!((skeptical.mean_rate - 20.0).abs() < 1e-9);

        let optimistic = OptimisticView::select(&t, 2010)?;
        assert_eq!(optimistic.points.len(), 3);
        Ok(())
    }
}
