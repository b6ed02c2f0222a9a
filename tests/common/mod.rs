//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use pv_match::series::{ConsumptionRecord, ProductionSample};

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Enedis export for 2023-06-01, local time +02:00, 48 half-hour readings.
pub fn consumption_fixture() -> PathBuf {
    fixture_path("consumption_enedis.csv")
}

/// PVGIS response covering 31 May and 1 June of 2020 and 2021.
pub fn production_fixture() -> PathBuf {
    fixture_path("pvgis_seriescalc.json")
}

/// Two half-hourly UTC readings per hour for `hours` consecutive hours of
/// 2023-06-01, values `(a, b)` for every hour.
pub fn half_hourly(hours: u32, a: f64, b: f64) -> Vec<ConsumptionRecord> {
    (0..hours)
        .flat_map(|h| {
            [
                ConsumptionRecord::new(format!("2023-06-01T{h:02}:00:00+00:00"), a),
                ConsumptionRecord::new(format!("2023-06-01T{h:02}:30:00+00:00"), b),
            ]
        })
        .collect()
}

/// One PVGIS-style sample per (year, hour) of 1 June, constant power per year.
pub fn june_first(years: &[(i32, f64)], hours: std::ops::Range<u32>) -> Vec<ProductionSample> {
    years
        .iter()
        .flat_map(|(year, power)| {
            hours
                .clone()
                .map(move |h| ProductionSample::new(format!("{year}0601:{h:02}10"), *power))
        })
        .collect()
}

/// Wraps production samples into a PVGIS `seriescalc` JSON document.
pub fn pvgis_json(samples: &[ProductionSample]) -> String {
    let rows: Vec<serde_json::Value> = samples
        .iter()
        .map(|s| {
            serde_json::json!({
                "time": s.timestamp,
                "P": s.power,
                "G(i)": 0.0,
                "H_sun": 0.0,
                "T2m": 15.0,
                "WS10m": 1.0,
                "Int": 0.0
            })
        })
        .collect();
    serde_json::json!({ "inputs": {}, "outputs": { "hourly": rows }, "meta": {} }).to_string()
}

/// Renders consumption records as an Enedis export with two metadata lines.
pub fn enedis_csv(records: &[ConsumptionRecord]) -> String {
    let mut out =
        String::from("Identifiant PRM;Pas en minutes\n00000000000000;30\nHorodate;Valeur\n");
    for r in records {
        out.push_str(&format!("{};{}\n", r.timestamp, r.value));
    }
    out
}
