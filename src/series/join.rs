//! Left join of hourly consumption against the typical-year baseline.

use std::collections::HashMap;

use tracing::{debug, info};

use super::types::{BaselineSlot, HourlyBucket, JoinedRow, JoinedTable, SlotKey};

/// Attaches baseline production to every consumption hour.
///
/// The lookup key is (month, day, hour); the consumption year is ignored so a
/// single typical year matches consumption from any calendar year. Hours
/// without a slot keep `production: None`. The output has exactly one row per
/// bucket, in bucket order, and no capacity columns yet.
pub fn left_join(buckets: &[HourlyBucket], slots: &[BaselineSlot]) -> JoinedTable {
    let baseline: HashMap<SlotKey, f64> = slots.iter().map(|s| (s.key, s.production)).collect();

    let rows: Vec<JoinedRow> = buckets
        .iter()
        .map(|b| JoinedRow {
            key: b.key,
            consumption: b.consumption,
            production: baseline.get(&b.key.slot()).copied(),
            variants: Vec::new(),
        })
        .collect();

    let table = JoinedTable {
        variants: Vec::new(),
        rows,
    };
    let unmatched = table.unmatched_rows();
    if unmatched > 0 {
        debug!(unmatched, "consumption hours without baseline production");
    }
    info!(rows = table.len(), unmatched, "joined consumption with baseline");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::types::HourKey;
    use chrono::NaiveDate;

    fn bucket(y: i32, m: u32, d: u32, h: u32, v: f64) -> HourlyBucket {
        HourlyBucket {
            key: HourKey {
                date: NaiveDate::from_ymd_opt(y, m, d).expect("valid date"),
                hour: h,
            },
            consumption: v,
        }
    }

    fn slot(m: u32, d: u32, h: u32, p: f64) -> BaselineSlot {
        BaselineSlot {
            key: SlotKey::new(m, d, h),
            production: p,
        }
    }

    #[test]
    fn cardinality_follows_consumption() {
        let buckets: Vec<HourlyBucket> = (0..10).map(|h| bucket(2023, 6, 1, h, 1.0)).collect();
        let slots = vec![
            slot(6, 1, 0, 10.0),
            slot(6, 1, 1, 20.0),
            slot(6, 1, 2, 30.0),
            slot(7, 1, 0, 99.0),
            slot(6, 2, 5, 99.0),
        ];
        let table = left_join(&buckets, &slots);
        assert_eq!(table.len(), 10);
        assert_eq!(table.rows.iter().filter(|r| r.production.is_some()).count(), 3);
        assert_eq!(table.unmatched_rows(), 7);
        assert_eq!(table.rows[2].production, Some(30.0));
    }

    #[test]
    fn year_is_not_part_of_key() {
        let buckets = vec![bucket(2019, 3, 4, 12, 1.0), bucket(2024, 3, 4, 12, 2.0)];
        let table = left_join(&buckets, &[slot(3, 4, 12, 42.0)]);
        assert!(table.rows.iter().all(|r| r.production == Some(42.0)));
    }

    #[test]
    fn no_slots_means_all_none() {
        let buckets = vec![bucket(2023, 1, 1, 0, 1.0)];
        let table = left_join(&buckets, &[]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].production, None);
    }

    #[test]
    fn empty_consumption_is_empty_table() {
        let table = left_join(&[], &[slot(1, 1, 0, 1.0)]);
        assert!(table.is_empty());
    }
}
