// skew-core/src/domain/summary.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::record::{ClassifiedRecord, ComplaintRecord, classify};

/// Inclusive range of received years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Allegation counts for one received year.
///
/// The rate is derived from the counts in [`YearlySummary::from_counts`] and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlySummary {
    year: i32,
    total_allegations: u64,
    substantiated_count: u64,
    substantiation_rate: f64,
}

impl YearlySummary {
    /// `substantiated` is clamped to `total`. `total` must be non-zero since
    /// absent years are never synthesized.
    pub fn from_counts(year: i32, total: u64, substantiated: u64) -> Self {
        let substantiated = substantiated.min(total);
        let substantiation_rate = if total == 0 {
            0.0
        } else {
            substantiated as f64 / total as f64 * 100.0
        };
        Self {
            year,
            total_allegations: total,
            substantiated_count: substantiated,
            substantiation_rate,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn total_allegations(&self) -> u64 {
        self.total_allegations
    }

    pub fn substantiated_count(&self) -> u64 {
        self.substantiated_count
    }

    pub fn unsubstantiated_count(&self) -> u64 {
        self.total_allegations - self.substantiated_count
    }

    pub fn substantiation_rate(&self) -> f64 {
        self.substantiation_rate
    }
}

/// Yearly rows sorted by ascending year, one row per year present in the data.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SummaryTable {
    rows: Vec<YearlySummary>,
}

impl SummaryTable {
    /// Sorts by year. Duplicate years are merged by summing their counts.
    pub fn from_rows(rows: impl IntoIterator<Item = YearlySummary>) -> Self {
        let mut merged: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
        for row in rows {
            let entry = merged.entry(row.year).or_default();
            entry.0 += row.total_allegations;
            entry.1 += row.substantiated_count;
        }
        Self {
            rows: merged
                .into_iter()
                .map(|(year, (total, subst))| YearlySummary::from_counts(year, total, subst))
                .collect(),
        }
    }

    pub fn rows(&self) -> &[YearlySummary] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &YearlySummary> {
        self.rows.iter()
    }

    pub fn get(&self, year: i32) -> Option<&YearlySummary> {
        self.rows
            .binary_search_by_key(&year, |r| r.year)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// First and last year present.
    pub fn span(&self) -> Option<YearRange> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some(YearRange {
                start: first.year,
                end: last.year,
            }),
            _ => None,
        }
    }

    pub fn total_allegations(&self) -> u64 {
        self.rows.iter().map(|r| r.total_allegations).sum()
    }

    pub fn total_substantiated(&self) -> u64 {
        self.rows.iter().map(|r| r.substantiated_count).sum()
    }

    pub fn within(&self, range: YearRange) -> SummaryTable {
        self.filtered(|year| range.contains(year))
    }

    pub fn from_year(&self, start: i32) -> SummaryTable {
        self.filtered(|year| year >= start)
    }

    /// The trailing `n` rows (fewer if the table is shorter).
    pub fn last(&self, n: usize) -> &[YearlySummary] {
        let skip = self.rows.len().saturating_sub(n);
        &self.rows[skip..]
    }

    fn filtered(&self, keep: impl Fn(i32) -> bool) -> SummaryTable {
        SummaryTable {
            rows: self.rows.iter().filter(|r| keep(r.year)).cloned().collect(),
        }
    }
}

/// Secondary grouping dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDimension {
    ComplainantEthnicity,
    AllegationType,
}

impl CategoryDimension {
    pub fn column(&self) -> &'static str {
        match self {
            CategoryDimension::ComplainantEthnicity => "complainant_ethnicity",
            CategoryDimension::AllegationType => "fado_type",
        }
    }

    fn value<'a>(&self, record: &'a ComplaintRecord) -> Option<&'a str> {
        match self {
            CategoryDimension::ComplainantEthnicity => record.complainant_ethnicity.as_deref(),
            CategoryDimension::AllegationType => record.fado_type.as_deref(),
        }
    }
}

impl fmt::Display for CategoryDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Allegation counts for one (category value, year) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    #[serde(flatten)]
    pub summary: YearlySummary,
}

/// Category-by-year rows, sorted by category then year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTable {
    pub dimension: CategoryDimension,
    pub rows: Vec<CategorySummary>,
}

impl CategoryTable {
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rows.iter().map(|r| r.category.as_str()).collect();
        names.dedup();
        names
    }
}

/// Everything the aggregation step produces for one record set.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub yearly: SummaryTable,
    pub by_ethnicity: CategoryTable,
    pub by_allegation_type: CategoryTable,
}

pub struct Aggregator;

impl Aggregator {
    pub fn aggregate(records: &[ComplaintRecord]) -> Aggregates {
        let classified = classify(records);
        Aggregates {
            yearly: Self::yearly(&classified),
            by_ethnicity: Self::by_category(&classified, CategoryDimension::ComplainantEthnicity),
            by_allegation_type: Self::by_category(&classified, CategoryDimension::AllegationType),
        }
    }

    /// Groups by received year. Only years with at least one record appear.
    pub fn yearly(records: &[ClassifiedRecord<'_>]) -> SummaryTable {
        let mut counts: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
        for r in records {
            let entry = counts.entry(r.record.year_received).or_default();
            entry.0 += 1;
            entry.1 += u64::from(r.is_substantiated);
        }
        SummaryTable {
            rows: counts
                .into_iter()
                .map(|(year, (total, subst))| YearlySummary::from_counts(year, total, subst))
                .collect(),
        }
    }

    /// Records without a value for `dimension` are left out of the table.
    pub fn by_category(
        records: &[ClassifiedRecord<'_>],
        dimension: CategoryDimension,
    ) -> CategoryTable {
        let mut counts: BTreeMap<(&str, i32), (u64, u64)> = BTreeMap::new();
        for r in records {
            let Some(category) = dimension.value(r.record) else {
                continue;
            };
            let entry = counts.entry((category, r.record.year_received)).or_default();
            entry.0 += 1;
            entry.1 += u64::from(r.is_substantiated);
        }
        CategoryTable {
            dimension,
            rows: counts
                .into_iter()
                .map(|((category, year), (total, subst))| CategorySummary {
                    category: category.to_string(),
                    summary: YearlySummary::from_counts(year, total, subst),
                })
                .collect(),
        }
    }
}
