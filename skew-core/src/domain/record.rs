// skew-core/src/domain/record.rs

use serde::{Deserialize, Serialize};

/// Disposition token marking a finding against the officer.
/// Matched case-sensitively, so "Unsubstantiated" never counts.
pub const SUBSTANTIATED_TOKEN: &str = "Substantiated";

/// Columns the allegations export must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "complaint_id",
    "year_received",
    "board_disposition",
    "complainant_ethnicity",
    "fado_type",
];

/// One complaint allegation, as read from the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub complaint_id: String,
    pub year_received: i32,
    pub board_disposition: Option<String>,
    pub complainant_ethnicity: Option<String>,
    /// FADO category (Force, Abuse of Authority, Discourtesy, Offensive Language).
    pub fado_type: Option<String>,
}

impl ComplaintRecord {
    pub fn new(complaint_id: impl Into<String>, year_received: i32) -> Self {
        Self {
            complaint_id: complaint_id.into(),
            year_received,
            board_disposition: None,
            complainant_ethnicity: None,
            fado_type: None,
        }
    }

    pub fn with_disposition(mut self, disposition: impl Into<String>) -> Self {
        self.board_disposition = Some(disposition.into());
        self
    }

    pub fn with_ethnicity(mut self, ethnicity: impl Into<String>) -> Self {
        self.complainant_ethnicity = Some(ethnicity.into());
        self
    }

    pub fn with_fado_type(mut self, fado_type: impl Into<String>) -> Self {
        self.fado_type = Some(fado_type.into());
        self
    }
}

/// A record paired with its derived outcome flag.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedRecord<'a> {
    pub record: &'a ComplaintRecord,
    pub is_substantiated: bool,
}

/// A missing disposition is never substantiated.
pub fn is_substantiated(disposition: Option<&str>) -> bool {
    disposition.is_some_and(|d| d.contains(SUBSTANTIATED_TOKEN))
}

pub fn classify(records: &[ComplaintRecord]) -> Vec<ClassifiedRecord<'_>> {
    records
        .iter()
        .map(|record| ClassifiedRecord {
            record,
            is_substantiated: is_substantiated(record.board_disposition.as_deref()),
        })
        .collect()
}
