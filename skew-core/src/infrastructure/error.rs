// skew-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(skew::infra::database::duckdb),
        help("An error occurred inside the SQL engine while reading the dataset.")
    )]
    DuckDB(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- INPUT DATA ---
    #[error("Dataset unavailable at {path:?}: {reason}")]
    #[diagnostic(
        code(skew::infra::data_unavailable),
        help("Check that the CSV export exists and is readable (see `input_path` in skew.yaml).")
    )]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("Dataset at {path:?} is missing required columns: {missing:?}")]
    #[diagnostic(
        code(skew::infra::schema_violation),
        help("The allegations export must contain complaint_id, year_received, board_disposition, complainant_ethnicity and fado_type.")
    )]
    SchemaViolation { path: PathBuf, missing: Vec<String> },

    // --- OUTPUT ARTIFACTS ---
    #[error("Failed to write artifact {path:?}: {source}")]
    #[diagnostic(
        code(skew::infra::write_failure),
        help("Check that the output directory exists and is writable.")
    )]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(skew::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(skew::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(skew::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(skew::infra::config))]
    ConfigError(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(skew::infra::template),
        help("The embedded chart template failed to render.")
    )]
    TemplateError(#[from] minijinja::Error),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

impl From<anyhow::Error> for InfrastructureError {
    fn from(err: anyhow::Error) -> Self {
        InfrastructureError::ConfigError(format!("{:#}", err))
    }
}
