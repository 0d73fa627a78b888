// skew-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for loading records, rendering charts and reporting progress.
pub mod ports;

// 2. Domain (business core)
// Records, aggregation, trend fitting, narrative views, chart specs.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB loader, HTML renderer, JSON exporter, YAML config, atomic writes.
pub mod infrastructure;

// 4. Application (Use Cases)
// Orchestration of the analysis and visualization runs.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use skew_core::SkewError;
pub use error::SkewError;
