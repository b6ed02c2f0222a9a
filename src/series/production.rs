//! Typical-year production: multi-year hourly output averaged per calendar hour.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::info;

use super::types::{BaselineSlot, ProductionSample, SlotKey};
use crate::error::{EstimateError, Result};

/// PVGIS hourly timestamp layout.
const PVGIS_TIME_FORMAT: &str = "%Y%m%d:%H%M";

/// Parses a `YYYYMMDD:HHMM` timestamp into its year-less slot.
///
/// The minute field is validated but otherwise ignored; PVGIS stamps each
/// hour at `HH10` or `HH00` depending on the radiation database.
///
/// # Errors
///
/// Returns `MalformedTimestamp` if the text does not match the layout.
pub fn parse_slot(raw: &str) -> Result<SlotKey> {
    let ts = NaiveDateTime::parse_from_str(raw.trim(), PVGIS_TIME_FORMAT).map_err(|e| {
        EstimateError::MalformedTimestamp {
            source_name: "production",
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(SlotKey::new(ts.month(), ts.day(), ts.hour()))
}

/// Collapses a multi-year hourly series into one typical year.
///
/// Every observed (month, day, hour) gets the arithmetic mean of all samples
/// sharing it. Keys never observed (e.g. 29 February in a series without
/// leap years) are absent. Slots come back ordered by key.
///
/// # Errors
///
/// Returns `EmptySeries` for an empty input and `MalformedTimestamp` on the
/// first unparsable timestamp.
pub fn average_years(samples: &[ProductionSample]) -> Result<Vec<BaselineSlot>> {
    if samples.is_empty() {
        return Err(EstimateError::EmptySeries("production"));
    }

    let mut sums: BTreeMap<SlotKey, (f64, u32)> = BTreeMap::new();
    for sample in samples {
        let entry = sums.entry(parse_slot(&sample.timestamp)?).or_insert((0.0, 0));
        entry.0 += sample.power;
        entry.1 += 1;
    }

    let slots: Vec<BaselineSlot> = sums
        .into_iter()
        .map(|(key, (sum, n))| BaselineSlot {
            key,
            production: sum / f64::from(n),
        })
        .collect();

    info!(
        samples = samples.len(),
        slots = slots.len(),
        "averaged production into typical year"
    );
    Ok(slots)
}
