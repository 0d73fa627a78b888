// skew-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SkewError {
    // --- DOMAIN ERRORS (empty selections, bad ranges) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, rendering) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl SkewError {
    /// True for errors that make the input unusable (the run cannot continue).
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            SkewError::Infrastructure(
                InfrastructureError::DataUnavailable { .. }
                    | InfrastructureError::SchemaViolation { .. }
            )
        )
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for SkewError {
    fn from(err: std::io::Error) -> Self {
        SkewError::Infrastructure(InfrastructureError::Io(err))
    }
}
