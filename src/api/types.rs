//! API request, response and query types.
//!
//! Row field names follow the CSV export columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::report::SelfConsumptionReport;
use crate::series::{JoinedRow, JoinedTable};

/// Configuration echo plus aggregate report.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Configuration used for the served run.
    pub config: PipelineConfig,
    pub report: SelfConsumptionReport,
}

/// One joined hour.
///
/// Capacity columns are flattened next to the fixed fields, e.g.
/// `"production_3kwc": 450.0`.
#[derive(Debug, Serialize)]
pub struct RowRecord {
    /// Row index in the table.
    pub index: usize,
    /// Start of the hour, `YYYY-MM-DDTHH:00:00`.
    pub timestamp: String,
    pub consumption_w: f64,
    /// Baseline 1 kWc production, `null` without a typical-year match.
    pub production_w: Option<f64>,
    #[serde(flatten)]
    pub capacities: BTreeMap<String, Option<f64>>,
}

impl RowRecord {
    pub fn from_row(index: usize, row: &JoinedRow, table: &JoinedTable) -> Self {
        Self {
            index,
            timestamp: row.key.to_string(),
            consumption_w: row.consumption,
            production_w: row.production,
            capacities: table
                .variants
                .iter()
                .zip(&row.variants)
                .map(|(v, value)| (v.name.clone(), *value))
                .collect(),
        }
    }

    /// Converts every row of a table.
    pub fn from_table(table: &JoinedTable) -> Vec<Self> {
        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| Self::from_row(i, r, table))
            .collect()
    }
}

/// Optional range query parameters for the rows endpoint.
#[derive(Debug, Deserialize)]
pub struct RowsQuery {
    /// Start row index (inclusive).
    pub from: Option<usize>,
    /// End row index (inclusive).
    pub to: Option<usize>,
}

/// On-demand estimate request.
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    /// Raw consumption export text.
    pub consumption_csv: String,
    /// PVGIS response document or bare hourly row array.
    pub production: Value,
    /// Capacities overriding the served configuration.
    #[serde(default)]
    pub capacities: Option<Vec<f64>>,
}

/// On-demand estimate result.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub report: SelfConsumptionReport,
    pub rows: Vec<RowRecord>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{CapacityVariant, HourKey, apply_capacities};
    use chrono::NaiveDate;

    #[test]
    fn row_record_maps_fields() {
        let mut table = JoinedTable {
            variants: Vec::new(),
            rows: vec![JoinedRow {
                key: HourKey {
                    date: NaiveDate::from_ymd_opt(2023, 6, 1).expect("valid date"),
                    hour: 12,
                },
                consumption: 400.0,
                production: Some(150.0),
                variants: Vec::new(),
            }],
        };
        apply_capacities(&mut table, &[CapacityVariant::new(3.0)]);

        let records = RowRecord::from_table(&table);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.timestamp, "2023-06-01T12:00:00");
        assert_eq!(r.consumption_w, 400.0);
        assert_eq!(r.production_w, Some(150.0));
        assert_eq!(r.capacities.get("production_3kwc"), Some(&Some(450.0)));

        let json = serde_json::to_value(r).unwrap_or_default();
        assert_eq!(json["production_3kwc"], 450.0);
        assert_eq!(json["index"], 0);
    }
}
