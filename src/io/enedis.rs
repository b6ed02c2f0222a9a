//! Reader for utility load-curve exports (Enedis layout by default).
//!
//! The export starts with metadata lines (meter identifier, date range,
//! unit, step), followed by a `Horodate;Valeur` header and one reading per
//! sampling interval. Line offsets, delimiter and column names come from
//! [`ConsumptionConfig`].

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::config::ConsumptionConfig;
use crate::error::{EstimateError, Result};
use crate::series::ConsumptionRecord;

const SOURCE: &str = "consumption";

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().trim_start_matches('\u{feff}') == name)
        .ok_or_else(|| EstimateError::missing_column(SOURCE, name))
}

/// Parses a reading, accepting a decimal comma. Non-finite values (`NaN`,
/// `inf`) are not readings.
fn parse_value(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .or_else(|| raw.replace(',', ".").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Reads consumption records from a delimited export.
///
/// Rows with an empty reading are skipped; the hour they belong to is then
/// treated like any other partial hour downstream.
///
/// # Errors
///
/// Returns `MissingColumn` if the header row lacks the timestamp or value
/// column (including when the input ends before the header row),
/// `MalformedValue` for a non-numeric reading, and `Csv` for reader failures.
pub fn read_consumption<R: Read>(
    reader: R,
    cfg: &ConsumptionConfig,
) -> Result<Vec<ConsumptionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(cfg.delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = rdr.records();

    let mut headers = None;
    for _ in 0..=cfg.header_row {
        match records.next() {
            Some(rec) => headers = Some(rec?),
            None => {
                headers = None;
                break;
            }
        }
    }
    let headers = headers.unwrap_or_default();
    let ts_idx = column_index(&headers, &cfg.timestamp_column)?;
    let value_idx = column_index(&headers, &cfg.value_column)?;

    let mut out = Vec::new();
    let mut skipped = 0_usize;
    for (row, rec) in records.enumerate() {
        let rec = rec?;
        let timestamp = rec.get(ts_idx).map(str::trim).unwrap_or("");
        let raw_value = rec.get(value_idx).map(str::trim).unwrap_or("");

        if timestamp.is_empty() && raw_value.is_empty() {
            continue;
        }
        if raw_value.is_empty() {
            skipped += 1;
            continue;
        }

        let value = parse_value(raw_value).ok_or_else(|| EstimateError::MalformedValue {
            source_name: SOURCE,
            value: raw_value.to_string(),
            row,
        })?;
        out.push(ConsumptionRecord::new(timestamp, value));
    }

    if skipped > 0 {
        debug!(skipped, "consumption rows without a reading");
    }
    debug!(records = out.len(), "read consumption export");
    Ok(out)
}
