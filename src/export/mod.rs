pub mod csv;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use regex::Regex;
use sketch_critique_common::Report;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// 読み込んだレポートの1行（列名 → 値）
pub type ReportRecord = HashMap<String, String>;

/// ファイル名に使えるモデル名（`.` → `-`、`/` → `_`）
pub fn clean_model_name(model: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[^A-Za-z0-9_\-]").unwrap();
    }
    let replaced = model.trim().replace('.', "-").replace('/', "_");
    UNSAFE_RE.replace_all(&replaced, "_").to_string()
}

pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn default_report_path(reports_dir: &Path, model: &str, timestamp: &str) -> PathBuf {
    reports_dir.join(format!("evaluation_{}_{}.csv", clean_model_name(model), timestamp))
}

/// 出力先を決定
///
/// 未指定なら既定のパス、ディレクトリ部分のないファイル名ならレポートディレクトリ配下。
pub fn resolve_output_path(
    output: Option<&Path>,
    reports_dir: &Path,
    model: &str,
    timestamp: &str,
) -> PathBuf {
    match output {
        None => default_report_path(reports_dir, model, timestamp),
        Some(path) => {
            let bare = path
                .parent()
                .map(|p| p.as_os_str().is_empty())
                .unwrap_or(true);
            if bare {
                reports_dir.join(path)
            } else {
                path.to_path_buf()
            }
        }
    }
}

/// `{stem}_{timestamp}{ext}`（同じディレクトリ）
pub fn timestamped_path(path: &Path, timestamp: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "sketch_evaluation".to_string());
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, timestamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, timestamp),
    };
    path.with_file_name(file_name)
}

/// ホームディレクトリへの最終退避先
pub fn home_fallback_path(home: &Path, timestamp: &str, extension: &str) -> PathBuf {
    home.join(format!("sketch_evaluation_{}.{}", timestamp, extension))
}

/// 書き込みに失敗したら別名 → ホームディレクトリの順で再試行
///
/// 最後まで失敗した場合のみエラーログを出し、None を返す。
pub fn write_with_fallback<F>(
    path: &Path,
    home: Option<&Path>,
    timestamp: &str,
    write: F,
) -> Option<PathBuf>
where
    F: Fn(&Path) -> Result<()>,
{
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "csv".to_string());

    let mut candidates = vec![path.to_path_buf(), timestamped_path(path, timestamp)];
    if let Some(home) = home {
        candidates.push(home_fallback_path(home, timestamp, &extension));
    }

    let last = candidates.len() - 1;
    for (i, candidate) in candidates.into_iter().enumerate() {
        match write(&candidate) {
            Ok(()) => {
                if i > 0 {
                    info!("代替パスに保存しました: {}", candidate.display());
                }
                return Some(candidate);
            }
            Err(e) if i < last => {
                debug!("書き込み失敗 {}: {}", candidate.display(), e);
            }
            Err(e) => {
                error!("レポートを保存できませんでした {}: {}", candidate.display(), e);
            }
        }
    }
    None
}

/// 形式に応じてレポートを書き出し、保存できたパスを返す
pub fn export_report(
    report: &Report,
    format: ExportFormat,
    path: &Path,
    home: Option<&Path>,
    timestamp: &str,
) -> Vec<PathBuf> {
    let mut written = Vec::new();

    if format.includes_csv() {
        let csv_path = path.with_extension("csv");
        if let Some(p) = write_with_fallback(&csv_path, home, timestamp, |p| self::csv::write_report(report, p)) {
            println!("✔ CSV出力: {}", p.display());
            written.push(p);
        }
    }

    if format.includes_excel() {
        let xlsx_path = path.with_extension("xlsx");
        if let Some(p) = write_with_fallback(&xlsx_path, home, timestamp, |p| self::excel::write_report(report, p)) {
            println!("✔ Excel出力: {}", p.display());
            written.push(p);
        }
    }

    written
}

/// 拡張子でCSV/XLSXを判別して読み込む
pub fn read_report(path: &Path) -> Result<Vec<ReportRecord>> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" => self::excel::read_records(path),
        _ => self::csv::read_records(path),
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
