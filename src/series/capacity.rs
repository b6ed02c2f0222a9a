//! Capacity scaling of the 1 kWc baseline.

use tracing::debug;

use super::types::{CapacityVariant, JoinedTable};

/// Adds one production column per requested capacity.
///
/// Each value is `baseline * multiplier`, computed per row; rows without
/// baseline production stay `None`. A variant whose column already exists is
/// recomputed in place, so applying the same list twice leaves the table
/// unchanged.
pub fn apply_capacities(table: &mut JoinedTable, variants: &[CapacityVariant]) {
    for variant in variants {
        let idx = match table.variant_index(&variant.name) {
            Some(idx) => {
                table.variants[idx] = variant.clone();
                idx
            }
            None => {
                table.variants.push(variant.clone());
                for row in &mut table.rows {
                    row.variants.push(None);
                }
                table.variants.len() - 1
            }
        };

        for row in &mut table.rows {
            row.variants[idx] = row.production.map(|p| p * variant.multiplier);
        }
        debug!(column = %variant.name, multiplier = variant.multiplier, "applied capacity");
    }
}
