// skew-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("No yearly rows left after selecting {selection}")]
    #[diagnostic(
        code(skew::domain::empty_selection),
        help("Check the analysis year range against the years present in the dataset.")
    )]
    EmptySelection { selection: String },

    #[error("Invalid year range: {start}..={end}")]
    #[diagnostic(
        code(skew::domain::year_range),
        help("The first year of a range must not be after the last one.")
    )]
    InvalidYearRange { start: i32, end: i32 },
}
