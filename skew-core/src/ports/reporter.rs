// skew-core/src/ports/reporter.rs

use std::fmt;
use std::path::Path;

use crate::domain::chart::{FramedChart, Narrative};
use crate::domain::summary::{CategoryTable, SummaryTable, YearRange};
use crate::error::SkewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Summary,
    Chart(Narrative),
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Summary => f.write_str("summary"),
            ArtifactKind::Chart(narrative) => write!(f, "{} chart", narrative),
        }
    }
}

/// Progress of a run, in the order the pipeline produces it.
#[derive(Debug)]
pub enum RunEvent<'a> {
    DatasetLoaded {
        source: &'a str,
        records: usize,
        /// Years present before the analysis range is applied.
        span: Option<YearRange>,
    },
    SummaryReady {
        table: &'a SummaryTable,
        range: YearRange,
    },
    CategoriesReady {
        table: &'a CategoryTable,
    },
    ArtifactWritten {
        kind: ArtifactKind,
        path: &'a Path,
    },
    ArtifactFailed {
        kind: ArtifactKind,
        path: &'a Path,
        error: &'a SkewError,
    },
    FramingDisclosed {
        chart: &'a FramedChart,
    },
    Completed {
        written: usize,
        failed: usize,
    },
}

/// Receives run progress. The console reporter prints it; tests collect it.
pub trait RunReporter {
    fn report(&mut self, event: RunEvent<'_>);
}

/// Discards everything.
pub struct SilentReporter;

impl RunReporter for SilentReporter {
    fn report(&mut self, _event: RunEvent<'_>) {}
}
