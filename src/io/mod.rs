//! Input readers and table export.

/// Utility load-curve CSV reader.
pub mod enedis;
pub mod export;
/// PVGIS hourly JSON reader.
pub mod pvgis;

pub use enedis::read_consumption;
pub use export::{export_csv, write_csv};
pub use pvgis::{read_production, samples_from_value};
