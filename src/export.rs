use std::fs::File;
use std::io::Write;
use std::path::Path;
use log::info;
use crate::channel::TimeSeriesTable;
use crate::error::ScopeError;
/// Write the table as CSV: a header row of column names, then one row per sample.
pub fn write_csv<W: Write>(table: &TimeSeriesTable, writer: W) -> Result<(), ScopeError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.column_names())?;
    let names = table.column_names();
    let columns: Vec<&[f64]> = names
        .iter()
        .filter_map(|name| table.column(name))
        .collect();
    let mut record = Vec::with_capacity(columns.len());
    for row in 0..table.len() {
        record.clear();
        record.extend(columns.iter().map(|column| column[row].to_string()));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}
pub fn save_csv(table: &TimeSeriesTable, path: impl AsRef<Path>) -> Result<(), ScopeError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_csv(table, File::create(path)?)?;
    info!(
        "saved {} rows to {}; columns: {}",
        table.len(),
        path.display(),
        table.column_names().join(", ")
    );
    Ok(())
}
