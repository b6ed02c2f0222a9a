//! Hour-by-hour comparison of household consumption with rooftop solar
//! production.
//!
//! Half-hourly meter readings are normalized to hourly buckets, a multi-year
//! PVGIS production series is collapsed into a typical year, the two are
//! left-joined on the calendar hour and the 1 kWc baseline is scaled to any
//! installed capacity.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod report;
/// Normalizer, averager, joiner and capacity scaler.
pub mod series;

pub use config::PipelineConfig;
pub use error::{EstimateError, Result};
pub use pipeline::{Estimate, estimate, estimate_from_readers, run};
