// skew-core/src/infrastructure/adapters/duckdb.rs

// Reads the allegations CSV through DuckDB's read_csv_auto. DuckDB sniffs the
// dialect but every column is read as VARCHAR; typing happens in the
// projection so one bad value only drops its own row.

use duckdb::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::domain::record::{ComplaintRecord, REQUIRED_COLUMNS};
use crate::error::SkewError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::record_source::RecordSource;

pub struct DuckDbRecordSource {
    path: PathBuf,
}

impl DuckDbRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl Into<String>) -> InfrastructureError {
        InfrastructureError::DataUnavailable {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    /// `read_csv_auto` over the path quoted as a SQL literal, with a header row and
    /// every column read as VARCHAR.
    fn scan(&self) -> String {
        let raw = self.path.to_string_lossy().replace('\'', "''");
        format!("read_csv_auto('{}', header = true, all_varchar = true)", raw)
    }

    fn fetch_columns(&self, conn: &Connection) -> Result<Vec<String>, InfrastructureError> {
        let query = format!("DESCRIBE SELECT * FROM {}", self.scan());
        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| self.unavailable(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| self.unavailable(e.to_string()))?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }
}

impl RecordSource for DuckDbRecordSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load_records(&self) -> Result<Vec<ComplaintRecord>, SkewError> {
        if !self.path.is_file() {
            return Err(self.unavailable("file not found").into());
        }

        let conn = Connection::open_in_memory().map_err(InfrastructureError::from)?;

        let columns = self.fetch_columns(&conn)?;
        debug!(?columns, "Detected CSV columns");
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !columns.iter().any(|c| c == *required))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(InfrastructureError::SchemaViolation {
                path: self.path.clone(),
                missing,
            }
            .into());
        }

        let query = format!(
            "SELECT \"complaint_id\", \
                    TRY_CAST(TRIM(\"year_received\") AS INTEGER), \
                    \"board_disposition\", \
                    \"complainant_ethnicity\", \
                    \"fado_type\" \
             FROM {}",
            self.scan()
        );
        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| self.unavailable(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<i32>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })
            .map_err(|e| self.unavailable(e.to_string()))?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            let (id, year, disposition, ethnicity, fado_type) =
                row.map_err(|e| self.unavailable(e.to_string()))?;
            match (non_blank(id), year) {
                (Some(complaint_id), Some(year_received)) => records.push(ComplaintRecord {
                    complaint_id,
                    year_received,
                    board_disposition: non_blank(disposition),
                    complainant_ethnicity: non_blank(ethnicity),
                    fado_type: non_blank(fado_type),
                }),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "Skipped rows without complaint_id or year_received");
        }
        info!(records = records.len(), "Loaded complaint records");
        Ok(records)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str =
        "complaint_id,year_received,board_disposition,complainant_ethnicity,fado_type,extra\n";

    #[test]
    fn test_loads_required_columns() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("allegations.csv");
        fs::write(
            &path,
            format!(
                "{}{}{}{}",
                HEADER,
                "1,2010,Substantiated (Charges),Black,Force,x\n",
                "2,2010,Unsubstantiated,,Abuse of Authority,y\n",
                "3,2011,Exonerated,Hispanic,Discourtesy,z\n"
            ),
        )?;

        let records = DuckDbRecordSource::new(&path).load_records()?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].complaint_id, "1");
        assert_eq!(records[0].year_received, 2010);
        assert_eq!(
            records[0].board_disposition.as_deref(),
            Some("Substantiated (Charges)")
        );
        assert_eq!(records[1].complainant_ethnicity, None);
        assert_eq!(records[2].fado_type.as_deref(), Some("Discourtesy"));
        Ok(())
    }

    #[test]
    fn test_rows_without_year_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("allegations.csv");
        fs::write(
            &path,
            format!(
                "{}{}{}",
                HEADER, "1,2012,Substantiated,White,Force,a\n", "2,,Exonerated,White,Force,b\n"
            ),
        )?;

        let records = DuckDbRecordSource::new(&path).load_records()?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year_received, 2012);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let source = DuckDbRecordSource::new("/definitely/not/here.csv");
        let err = source.load_records().err();
        assert!(err.is_some_and(|e| e.is_data_error()));
    }

    #[test]
    fn test_missing_column_is_schema_violation() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("allegations.csv");
        fs::write(
            &path,
            "complaint_id,year_received,board_disposition\n1,2010,Substantiated\n",
        )?;

        match DuckDbRecordSource::new(&path).load_records() {
            Err(SkewError::Infrastructure(InfrastructureError::SchemaViolation {
                missing, ..
            })) => {
                assert_eq!(missing, vec!["complainant_ethnicity", "fado_type"]);
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_quote_in_path_is_escaped() {
        let source = DuckDbRecordSource::new("/tmp/o'brien.csv");
        assert_eq!(
            source.scan(),
            "read_csv_auto('/tmp/o''brien.csv', header = true, all_varchar = true)"
        );
    }

    fn with_good_rows(count: usize, tail: &str) -> String {
        let mut csv = String::from(HEADER);
        for i in 0..count {
            csv.push_str(&format!("{},2010,Exonerated,White,Force,x\n", i));
        }
        csv.push_str(tail);
        csv
    }

    #[test]
    fn test_bad_year_past_type_sample_is_skipped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("allegations.csv");
        // Beyond DuckDB's 20,480-row sniffing sample.
        fs::write(
            &path,
            with_good_rows(30_000, "99999,unknown,Exonerated,Black,Force,x\n"),
        )?;

        let records = DuckDbRecordSource::new(&path).load_records()?;
        assert_eq!(records.len(), 30_000);
        assert!(records.iter().all(|r| r.year_received == 2010));
        Ok(())
    }

    #[test]
    fn test_malformed_csv_is_data_unavailable() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("allegations.csv");
        fs::write(
            &path,
            with_good_rows(30_000, "7,2010,\"Substantiated,Black,Force,x,y,z\n"),
        )?;

        match DuckDbRecordSource::new(&path).load_records() {
            Err(e) => {
                assert!(e.is_data_error(), "unexpected error kind: {:?}", e);
                assert!(matches!(
                    e,
                    SkewError::Infrastructure(InfrastructureError::DataUnavailable { .. })
                ));
            }
            Ok(records) => panic!("expected DataUnavailable, loaded {} records", records.len()),
        }
        Ok(())
    }
}
