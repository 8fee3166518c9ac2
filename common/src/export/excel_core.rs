//! Excel生成（共通ライブラリ）
//!
//! report.rs の再評価レポートを1シートのExcelとしてバッファに生成

use crate::report::{Cell, Report};
use rust_xlsxwriter::*;

/// 既定のシート名
pub const DEFAULT_SHEET_NAME: &str = "Re-evaluation";

/// 講評・ヒント列の幅
const LONG_TEXT_COL_WIDTH: f64 = 48.0;
const DEFAULT_COL_WIDTH: f64 = 14.0;

fn is_long_text_column(name: &str) -> bool {
    name.ends_with("_rationale") || name.ends_with("_tips") || name == "image_url"
}

/// Excelをバッファに生成
///
/// 1行目がヘッダー（太字・固定）、以降が1作品1行。
pub fn generate_report_buffer(report: &Report, sheet_name: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let text_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, name) in report.columns.iter().enumerate() {
        let col = col as u16;
        let width = if is_long_text_column(name) {
            LONG_TEXT_COL_WIDTH
        } else {
            DEFAULT_COL_WIDTH
        };
        worksheet
            .set_column_width(col, width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(0, col, name, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (index, row) in report.rows.iter().enumerate() {
        let excel_row = index as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet
                        .write_string_with_format(excel_row, col, s, &text_format)
                        .map_err(|e| format!("値書き込みエラー: {}", e))?;
                }
                Cell::Int(i) => {
                    worksheet
                        .write_number(excel_row, col, *i as f64)
                        .map_err(|e| format!("値書き込みエラー: {}", e))?;
                }
                Cell::Float(v) => {
                    worksheet
                        .write_number(excel_row, col, *v)
                        .map_err(|e| format!("値書き込みエラー: {}", e))?;
                }
            }
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    // バッファに書き出し
    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
