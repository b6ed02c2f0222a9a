//! Reader for PVGIS `seriescalc` hourly output.
//!
//! Rows live under `outputs.hourly`; each carries the hourly timestamp, the
//! power `P` for the requested peak power, and ancillary columns (`G(i)`,
//! `H_sun`, `T2m`, `WS10m`, `Int`) that are ignored here.

use std::io::Read;

use serde_json::Value;
use tracing::debug;

use crate::config::ProductionConfig;
use crate::error::{EstimateError, Result};
use crate::series::ProductionSample;

const SOURCE: &str = "production";
const HOURLY_PATH: &str = "outputs.hourly";

/// Reads production samples from a PVGIS JSON document.
///
/// # Errors
///
/// Returns `Json` for invalid JSON, plus everything [`samples_from_value`]
/// returns.
pub fn read_production<R: Read>(
    reader: R,
    cfg: &ProductionConfig,
) -> Result<Vec<ProductionSample>> {
    let doc: Value = serde_json::from_reader(reader)?;
    samples_from_value(&doc, cfg)
}

/// Extracts production samples from an already deserialized document.
///
/// Accepts either the full response object or the bare hourly row array.
///
/// # Errors
///
/// Returns `MissingColumn` when the hourly rows, the timestamp or the power
/// field cannot be found, and `MalformedValue` when a power field is not a
/// number.
pub fn samples_from_value(doc: &Value, cfg: &ProductionConfig) -> Result<Vec<ProductionSample>> {
    let rows = match doc {
        Value::Array(rows) => rows,
        _ => doc
            .pointer("/outputs/hourly")
            .and_then(Value::as_array)
            .ok_or_else(|| EstimateError::missing_column(SOURCE, HOURLY_PATH))?,
    };

    let samples = rows
        .iter()
        .enumerate()
        .map(|(row, value)| sample_from_row(row, value, cfg))
        .collect::<Result<Vec<_>>>()?;

    debug!(samples = samples.len(), "read production series");
    Ok(samples)
}

fn sample_from_row(row: usize, value: &Value, cfg: &ProductionConfig) -> Result<ProductionSample> {
    let timestamp = value
        .get(&cfg.timestamp_column)
        .and_then(Value::as_str)
        .ok_or_else(|| EstimateError::missing_column(SOURCE, &cfg.timestamp_column))?;

    let power = value
        .get(&cfg.power_column)
        .ok_or_else(|| EstimateError::missing_column(SOURCE, &cfg.power_column))?;
    let power = power.as_f64().ok_or_else(|| EstimateError::MalformedValue {
        source_name: SOURCE,
        value: power.to_string(),
        row,
    })?;

    Ok(ProductionSample::new(timestamp, power))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "inputs": { "location": { "latitude": 45.0, "longitude": 5.0 } },
            "outputs": {
                "hourly": [
                    {
                        "time": "20200601:1210", "P": 612.4, "G(i)": 700.1,
                        "H_sun": 60.2, "T2m": 21.0, "WS10m": 2.1, "Int": 0.0
                    },
                    {
                        "time": "20210601:1210", "P": 587.6, "G(i)": 680.0,
                        "H_sun": 60.1, "T2m": 19.5, "WS10m": 3.4, "Int": 0.0
                    }
                ]
            },
            "meta": {}
        })
    }

    #[test]
    fn reads_full_response() {
        let samples = samples_from_value(&response(), &ProductionConfig::default()).expect("read");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], ProductionSample::new("20200601:1210", 612.4));
    }

    #[test]
    fn reads_bare_row_array() {
        let rows = json!([{ "time": "20200101:0010", "P": 0 }]);
        let samples = samples_from_value(&rows, &ProductionConfig::default()).expect("read");
        assert_eq!(samples[0].power, 0.0);
    }

    #[test]
    fn reads_from_reader() {
        let text = response().to_string();
        let samples =
            read_production(text.as_bytes(), &ProductionConfig::default()).expect("read");
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn missing_hourly_rows() {
        let err = samples_from_value(&json!({ "outputs": {} }), &ProductionConfig::default());
        assert!(matches!(
            err,
            Err(EstimateError::MissingColumn { ref column, .. }) if column == "outputs.hourly"
        ));
    }

    #[test]
    fn missing_power_column() {
        let rows = json!([{ "time": "20200101:0010", "G(i)": 0.0 }]);
        let err = samples_from_value(&rows, &ProductionConfig::default());
        assert!(matches!(
            err,
            Err(EstimateError::MissingColumn { ref column, .. }) if column == "P"
        ));
    }

    #[test]
    fn non_numeric_power() {
        let rows = json!([{ "time": "20200101:0010", "P": "n/a" }]);
        let err = samples_from_value(&rows, &ProductionConfig::default());
        assert!(matches!(err, Err(EstimateError::MalformedValue { row: 0, .. })));
    }

    #[test]
    fn invalid_json() {
        let err = read_production("{ not json".as_bytes(), &ProductionConfig::default());
        assert!(matches!(err, Err(EstimateError::Json(_))));
    }
}
