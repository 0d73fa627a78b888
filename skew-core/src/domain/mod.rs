// skew-core/src/domain/mod.rs

pub mod chart;
pub mod config;
pub mod error;
pub mod record;
pub mod summary;
pub mod trend;
pub mod views;

pub use error::DomainError;
