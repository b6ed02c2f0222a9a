//! Consumption normalization: sub-hourly meter readings to hourly buckets.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::{debug, info};

use super::types::{ConsumptionRecord, HourKey, HourlyBucket};
use crate::config::{ConsumptionConfig, TimezonePolicy};
use crate::error::{EstimateError, Result};

/// Offset form used when the export omits the colon (`+0100`).
const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parses a consumption timestamp and applies the timezone policy.
///
/// Accepts RFC 3339 (`2023-01-01T00:30:00+01:00`) and the compact offset
/// form (`2023-01-01T00:30:00+0100`).
///
/// # Errors
///
/// Returns `MalformedTimestamp` if neither form matches.
pub fn parse_timestamp(raw: &str, policy: TimezonePolicy) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    let parsed: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, COMPACT_OFFSET_FORMAT))
        .map_err(|e| EstimateError::MalformedTimestamp {
            source_name: "consumption",
            value: raw.to_string(),
            reason: e.to_string(),
        })?;

    Ok(match policy {
        TimezonePolicy::Utc => parsed.naive_utc(),
        TimezonePolicy::Local => parsed.naive_local(),
    })
}

/// Buckets sub-hourly readings into hourly averages.
///
/// Each hour's value is the sum of its readings divided by the nominal
/// `samples_per_hour`, also for hours with fewer readings than nominal
/// (DST transitions, truncated exports). Buckets come back in chronological
/// order. An empty input yields an empty output.
///
/// # Errors
///
/// Returns `MalformedTimestamp` on the first unparsable timestamp.
pub fn normalize(
    records: &[ConsumptionRecord],
    cfg: &ConsumptionConfig,
) -> Result<Vec<HourlyBucket>> {
    let samples_per_hour = f64::from(cfg.samples_per_hour());
    let mut sums: BTreeMap<HourKey, (f64, u32)> = BTreeMap::new();

    for record in records {
        let ts = parse_timestamp(&record.timestamp, cfg.timezone)?;
        let entry = sums.entry(HourKey::from_datetime(&ts)).or_insert((0.0, 0));
        entry.0 += record.value;
        entry.1 += 1;
    }

    let partial = sums
        .values()
        .filter(|(_, n)| f64::from(*n) < samples_per_hour)
        .count();
    if partial > 0 {
        debug!(partial, "hours with fewer readings than nominal");
    }

    let buckets: Vec<HourlyBucket> = sums
        .into_iter()
        .map(|(key, (sum, _))| HourlyBucket {
            key,
            consumption: sum / samples_per_hour,
        })
        .collect();

    info!(
        records = records.len(),
        buckets = buckets.len(),
        "normalized consumption to hourly buckets"
    );
    Ok(buckets)
}
