//! CSV export for joined consumption/production tables.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::series::JoinedTable;

/// Fixed leading columns; one `production_<k>kwc` column per capacity follows.
const LEADING_COLUMNS: [&str; 3] = ["timestamp", "consumption_w", "production_w"];

/// Exports a joined table to a CSV file at the given path.
///
/// Writes a header row followed by one data row per consumption hour.
/// Produces byte-identical output for identical inputs.
///
/// # Arguments
///
/// * `table` - Joined, capacity-scaled table
/// * `decimals` - Fractional digits for every numeric cell
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(table: &JoinedTable, decimals: usize, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(table, decimals, buf)
}

/// Writes a joined table as CSV to any writer.
///
/// Missing production is written as an empty cell.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(table: &JoinedTable, decimals: usize, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let header: Vec<&str> = LEADING_COLUMNS
        .iter()
        .copied()
        .chain(table.variants.iter().map(|v| v.name.as_str()))
        .collect();
    wtr.write_record(&header)?;

    let cell = |v: Option<f64>| v.map_or_else(String::new, |v| format!("{v:.decimals$}"));

    for r in &table.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(r.key.to_string());
        record.push(format!("{:.decimals$}", r.consumption));
        record.push(cell(r.production));
        record.extend(r.variants.iter().copied().map(cell));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
