//! Typed records and keys flowing through the estimate pipeline.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// One raw meter reading as read from the consumption export.
///
/// `value` is the average power (W) over the sampling interval that starts
/// at `timestamp`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRecord {
    /// Timestamp text with trailing UTC offset (e.g. `2023-01-01T00:30:00+01:00`).
    pub timestamp: String,
    /// Reading (W).
    pub value: f64,
}

impl ConsumptionRecord {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// One hourly sample of a multi-year production simulation for 1 kWc.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionSample {
    /// Hourly timestamp text, `YYYYMMDD:HHMM`.
    pub timestamp: String,
    /// Power output (W).
    pub power: f64,
}

impl ProductionSample {
    pub fn new(timestamp: impl Into<String>, power: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            power,
        }
    }
}

/// Calendar hour with year, the key of normalized consumption.
///
/// Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourKey {
    pub date: NaiveDate,
    /// Hour of day, 0..=23.
    pub hour: u32,
}

impl HourKey {
    /// Truncates a date-time to its hour.
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            date: dt.date(),
            hour: dt.hour(),
        }
    }

    /// Year-less slot used to look up baseline production.
    pub fn slot(&self) -> SlotKey {
        SlotKey {
            month: self.date.month(),
            day: self.date.day(),
            hour: self.hour,
        }
    }

    /// Start of the hour as a naive date-time.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(self.hour))
    }
}

impl fmt::Display for HourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timestamp().format("%Y-%m-%dT%H:%M:%S"))
    }
}

/// Calendar hour without year, the key of the typical-year baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl SlotKey {
    pub fn new(month: u32, day: u32, hour: u32) -> Self {
        Self { month, day, hour }
    }
}

/// Consumption normalized to one hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyBucket {
    pub key: HourKey,
    /// Average power over the hour (W), numerically the hour's energy in Wh.
    pub consumption: f64,
}

/// Typical-year production for one calendar hour (1 kWc).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineSlot {
    pub key: SlotKey,
    /// Mean power across every source year (W).
    pub production: f64,
}

/// Installed capacity expressed as a multiple of the 1 kWc baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityVariant {
    pub multiplier: f64,
    /// Derived column name, e.g. `production_3kwc`.
    pub name: String,
}

impl CapacityVariant {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            name: variant_name(multiplier),
        }
    }
}

fn variant_name(multiplier: f64) -> String {
    let k = if multiplier.fract() == 0.0 {
        format!("{multiplier:.0}")
    } else {
        multiplier.to_string().replace('.', "_")
    };
    format!("production_{k}kwc")
}

/// One output row: a consumption hour with its matched production.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub key: HourKey,
    /// Hourly consumption (W).
    pub consumption: f64,
    /// Baseline 1 kWc production, `None` when the typical year has no slot
    /// for this calendar hour.
    pub production: Option<f64>,
    /// One value per [`JoinedTable::variants`] entry, same order.
    pub variants: Vec<Option<f64>>,
}

/// Joined consumption/production table, rows in chronological order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoinedTable {
    /// Capacity columns present on every row.
    pub variants: Vec<CapacityVariant>,
    pub rows: Vec<JoinedRow>,
}

impl JoinedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows without a baseline match.
    pub fn unmatched_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.production.is_none()).count()
    }

    /// Position of the capacity column with the given name.
    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.name == name)
    }
}
