//! Excel入出力（CLI版）
//!
//! 書き出しは共通ライブラリの excel_core、読み込みは calamine を使用

use super::{ensure_parent_dir, ReportRecord};
use crate::error::{Result, SketchCritiqueError};
use calamine::{open_workbook_auto, Data, Reader};
use sketch_critique_common::export::excel_core::{generate_report_buffer, DEFAULT_SHEET_NAME};
use sketch_critique_common::Report;
use std::path::Path;

pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    let buffer = generate_report_buffer(report, DEFAULT_SHEET_NAME)
        .map_err(SketchCritiqueError::Export)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, buffer)?;
    Ok(())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{:.1}", f),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// 先頭シートを読み込む（1行目がヘッダー）
pub fn read_records(path: &Path) -> Result<Vec<ReportRecord>> {
    if !path.is_file() {
        return Err(SketchCritiqueError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SketchCritiqueError::ReportRead(format!("{}: {}", path.display(), e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SketchCritiqueError::ReportRead("シートがありません".into()))?
        .map_err(|e| SketchCritiqueError::ReportRead(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(cell_text).collect();

    Ok(rows
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .map(|(h, cell)| (h.clone(), cell_text(cell)))
                .collect()
        })
        .collect())
}
