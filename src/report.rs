//! Post-hoc self-consumption indicators from a joined table.

use std::fmt;

use serde::Serialize;

use crate::series::JoinedTable;

/// Energy balance of one capacity variant over the matched hours.
///
/// Hourly values are average power over one hour, so sums are in Wh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantReport {
    /// Capacity column name.
    pub name: String,
    /// Installed capacity (kWc).
    pub multiplier: f64,
    /// Consumption over matched hours (Wh).
    pub consumption_wh: f64,
    /// Production over matched hours (Wh).
    pub production_wh: f64,
    /// Production consumed in the same hour (Wh).
    pub self_consumed_wh: f64,
    /// Production exceeding same-hour consumption (Wh).
    pub surplus_wh: f64,
    /// Share of production consumed on site.
    pub self_consumption_pct: f64,
    /// Share of consumption covered by production.
    pub coverage_pct: f64,
}

/// Aggregate indicators for a complete joined table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfConsumptionReport {
    /// Total consumption hours.
    pub rows: usize,
    /// Hours without baseline production.
    pub unmatched_rows: usize,
    /// One entry per capacity column, table order.
    pub variants: Vec<VariantReport>,
}

fn pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { 100.0 * part / whole } else { 0.0 }
}

impl SelfConsumptionReport {
    /// Computes all indicators from the joined table.
    pub fn from_table(table: &JoinedTable) -> Self {
        let variants = table
            .variants
            .iter()
            .enumerate()
            .map(|(idx, variant)| {
                let mut consumption_wh = 0.0_f64;
                let mut production_wh = 0.0_f64;
                let mut self_consumed_wh = 0.0_f64;

                for row in &table.rows {
                    let Some(produced) = row.variants.get(idx).copied().flatten() else {
                        continue;
                    };
                    consumption_wh += row.consumption;
                    production_wh += produced;
                    self_consumed_wh += row.consumption.min(produced).max(0.0);
                }

                VariantReport {
                    name: variant.name.clone(),
                    multiplier: variant.multiplier,
                    consumption_wh,
                    production_wh,
                    self_consumed_wh,
                    surplus_wh: production_wh - self_consumed_wh,
                    self_consumption_pct: pct(self_consumed_wh, production_wh),
                    coverage_pct: pct(self_consumed_wh, consumption_wh),
                }
            })
            .collect();

        Self {
            rows: table.len(),
            unmatched_rows: table.unmatched_rows(),
            variants,
        }
    }
}

impl fmt::Display for SelfConsumptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Self-consumption Report ---")?;
        writeln!(f, "Consumption hours: {}", self.rows)?;
        writeln!(f, "Hours without production data: {}", self.unmatched_rows)?;
        for v in &self.variants {
            writeln!(f)?;
            writeln!(f, "[{}] {} kWc", v.name, v.multiplier)?;
            writeln!(f, "  Consumption: {:.1} kWh", v.consumption_wh / 1000.0)?;
            writeln!(f, "  Production: {:.1} kWh", v.production_wh / 1000.0)?;
            writeln!(f, "  Self-consumed: {:.1} kWh", v.self_consumed_wh / 1000.0)?;
            writeln!(f, "  Surplus: {:.1} kWh", v.surplus_wh / 1000.0)?;
            writeln!(f, "  Self-consumption rate: {:.1}%", v.self_consumption_pct)?;
            writeln!(f, "  Coverage rate: {:.1}%", v.coverage_pct)?;
        }
        Ok(())
    }
}
