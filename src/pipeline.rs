//! Orchestration of the estimate: normalize, average, join, scale.

use std::io::Read;

use tracing::info_span;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::io::{read_consumption, read_production};
use crate::report::SelfConsumptionReport;
use crate::series::{
    ConsumptionRecord, JoinedTable, ProductionSample, apply_capacities, average_years, left_join,
    normalize,
};

/// Joined table plus the indicators derived from it.
#[derive(Debug, Clone)]
pub struct Estimate {
    pub table: JoinedTable,
    pub report: SelfConsumptionReport,
}

impl Estimate {
    fn from_table(table: JoinedTable) -> Self {
        let report = SelfConsumptionReport::from_table(&table);
        Self { table, report }
    }
}

/// Runs the four stages on already materialized records.
///
/// The first failure aborts the run. An empty consumption series yields an
/// empty table; an empty production series is an error.
///
/// # Errors
///
/// Returns `Config` for an invalid configuration, then whatever the first
/// failing stage reports.
pub fn run(
    consumption: &[ConsumptionRecord],
    production: &[ProductionSample],
    cfg: &PipelineConfig,
) -> Result<JoinedTable> {
    let _span = info_span!("estimate").entered();
    cfg.ensure_valid()?;

    let buckets = normalize(consumption, &cfg.consumption)?;
    let slots = average_years(production)?;
    let mut table = left_join(&buckets, &slots);
    apply_capacities(&mut table, &cfg.capacity.variants());
    Ok(table)
}

/// Runs the pipeline and computes the self-consumption report.
///
/// # Errors
///
/// Same as [`run`].
pub fn estimate(
    consumption: &[ConsumptionRecord],
    production: &[ProductionSample],
    cfg: &PipelineConfig,
) -> Result<Estimate> {
    run(consumption, production, cfg).map(Estimate::from_table)
}

/// Reads both raw inputs and runs the pipeline.
///
/// # Arguments
///
/// * `consumption_csv` - Utility load-curve export
/// * `production_json` - PVGIS `seriescalc` response
/// * `cfg` - Pipeline configuration
///
/// # Errors
///
/// Returns reader errors (`MissingColumn`, `MalformedValue`, `Csv`, `Json`)
/// before any stage runs, then the same errors as [`run`].
pub fn estimate_from_readers<C: Read, P: Read>(
    consumption_csv: C,
    production_json: P,
    cfg: &PipelineConfig,
) -> Result<Estimate> {
    cfg.ensure_valid()?;
    let consumption = read_consumption(consumption_csv, &cfg.consumption)?;
    let production = read_production(production_json, &cfg.production)?;
    estimate(&consumption, &production, cfg)
}
