//! Hourly alignment of household consumption and solar production.

/// Capacity scaling of the 1 kWc baseline.
pub mod capacity;
/// Half-hourly consumption to hourly buckets.
pub mod consumption;
/// Left join on the year-less calendar hour.
pub mod join;
/// Multi-year production to a typical year.
pub mod production;
pub mod types;

pub use capacity::apply_capacities;
pub use consumption::normalize;
pub use join::left_join;
pub use production::average_years;
pub use types::{
    BaselineSlot, CapacityVariant, ConsumptionRecord, HourKey, HourlyBucket, JoinedRow,
    JoinedTable, ProductionSample, SlotKey,
};
