//! CSV入出力

use super::{ensure_parent_dir, ReportRecord};
use crate::error::{Result, SketchCritiqueError};
use sketch_critique_common::Report;
use std::path::Path;

pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(&report.columns)?;
    for row in &report.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_records(path: &Path) -> Result<Vec<ReportRecord>> {
    if !path.is_file() {
        return Err(SketchCritiqueError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
        );
    }
    Ok(records)
}
