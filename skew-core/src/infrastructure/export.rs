// skew-core/src/infrastructure/export.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::domain::summary::{SummaryTable, YearlySummary};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

/// One row of `yearly_stats.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedYear {
    pub year: i32,
    pub total_allegations: u64,
    pub substantiated_count: u64,
    pub substantiation_rate: f64,
}

impl From<&YearlySummary> for ExportedYear {
    fn from(row: &YearlySummary) -> Self {
        Self {
            year: row.year(),
            total_allegations: row.total_allegations(),
            substantiated_count: row.substantiated_count(),
            substantiation_rate: row.substantiation_rate(),
        }
    }
}

/// Compact, record-oriented JSON: one object per row, table order.
pub fn summary_json(table: &SummaryTable) -> Result<String, InfrastructureError> {
    let rows: Vec<ExportedYear> = table.iter().map(ExportedYear::from).collect();
    Ok(serde_json::to_string(&rows)?)
}

pub fn export_summary(table: &SummaryTable, path: &Path) -> Result<(), InfrastructureError> {
    let json = summary_json(table)?;
    atomic_write(path, json)?;
    info!(path = ?path, rows = table.len(), "Exported yearly summary");
    Ok(())
}

pub fn read_summary(path: &Path) -> Result<Vec<ExportedYear>, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
