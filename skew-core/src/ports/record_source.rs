// skew-core/src/ports/record_source.rs

// Where complaint rows come from. The application only knows this shape;
// the DuckDB CSV reader is one implementation, test fixtures are another.

use crate::domain::record::ComplaintRecord;
use crate::error::SkewError;

pub trait RecordSource {
    /// Human readable origin, e.g. the CSV path.
    fn describe(&self) -> String;

    /// Reads every usable row. Fails with `DataUnavailable` when the source
    /// cannot be opened and `SchemaViolation` when a required column is
    /// missing.
    fn load_records(&self) -> Result<Vec<ComplaintRecord>, SkewError>;
}

impl RecordSource for Vec<ComplaintRecord> {
    fn describe(&self) -> String {
        format!("{} in-memory records", self.len())
    }

    fn load_records(&self) -> Result<Vec<ComplaintRecord>, SkewError> {
        Ok(self.clone())
    }
}
