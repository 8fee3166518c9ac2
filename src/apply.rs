//! 再評価レポートの反映
//!
//! バッチが出力したレポート（CSV/XLSX）の `new_{key}_*` 列をデータストアへ書き戻す。
//! タイトルと説明は `--retitle` 指定時のみ変更する。

use crate::datastore::ArtworkStore;
use crate::error::Result;
use crate::export::ReportRecord;
use regex::Regex;
use serde_json::Value;
use sketch_critique_common::mapping::{rationale_column, score_column, tips_column};
use sketch_critique_common::{Criterion, Row, SCORE_MAX, SCORE_MIN};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub retitle: bool,
    pub dry_run: bool,
    /// evaluation_version に記録する値
    pub label: String,
}

#[derive(Debug, Default)]
pub struct ApplySummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// (ID, 更新内容)。ドライランでは反映されない
    pub planned: Vec<(String, Row)>,
}

/// `"Tip1.; Tip2."` → `["Tip1", "Tip2"]`
pub fn parse_tips(text: &str) -> Vec<String> {
    lazy_static::lazy_static! {
        static ref TRAILING_PERIODS: Regex = Regex::new(r"\.+$").unwrap();
    }
    text.split(';')
        .map(|tip| TRAILING_PERIODS.replace(tip.trim(), "").trim().to_string())
        .filter(|tip| !tip.is_empty())
        .collect()
}

/// `"14"` / `"14.0"` → 14。範囲外や非数値は None
pub fn parse_score(text: &str) -> Option<i64> {
    let value = text.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    let score = value.round() as i64;
    (SCORE_MIN..=SCORE_MAX).contains(&score).then_some(score)
}

/// 旧タイトルを説明に残す
pub fn retitle_description(previous_title: &str, description: &str) -> String {
    let note = format!("re-evaluated; previous title: {}", previous_title);
    if description.trim().is_empty() {
        note
    } else {
        format!("{}\n\n{}", description.trim_end(), note)
    }
}

fn field<'a>(record: &'a ReportRecord, key: &str) -> &'a str {
    record.get(key).map(|s| s.trim()).unwrap_or("")
}

/// レポート1行から更新内容を作る（IDがなければ None）
pub fn build_update(record: &ReportRecord) -> Option<(String, Row)> {
    let id = field(record, "id");
    if id.is_empty() {
        return None;
    }

    let mut changes = Row::new();
    for criterion in Criterion::ALL {
        let key = criterion.key();
        let Some(score) = parse_score(field(record, &format!("new_{}_score", key))) else {
            continue;
        };
        changes.insert(score_column(criterion), Value::from(score));
        changes.insert(
            rationale_column(criterion),
            Value::from(field(record, &format!("new_{}_rationale", key))),
        );
        changes.insert(
            tips_column(criterion),
            Value::from(parse_tips(field(record, &format!("new_{}_tips", key)))),
        );
    }

    Some((id.to_string(), changes))
}

pub async fn apply_report(
    store: &dyn ArtworkStore,
    records: &[ReportRecord],
    options: &ApplyOptions,
) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    for (index, record) in records.iter().enumerate() {
        let Some((id, mut changes)) = build_update(record) else {
            warn!("{}行目: id がないためスキップ", index + 2);
            summary.skipped += 1;
            continue;
        };

        if changes.is_empty() {
            warn!("{}: 新しいスコアがないためスキップ", id);
            summary.skipped += 1;
            continue;
        }
        changes.insert("evaluation_version".into(), Value::from(options.label.clone()));

        let new_title = field(record, "generated_title");
        if options.retitle && !new_title.is_empty() {
            // ドライランではデータストアを参照せず、レポートの旧タイトルで注記だけを示す
            let description = if options.dry_run {
                retitle_description(field(record, "title"), "")
            } else {
                match store.get(&id).await {
                    Ok(current) => retitle_description(&current.title, &current.description),
                    Err(e) => {
                        error!("{}: 現在の値を取得できません: {}", id, e);
                        summary.failed += 1;
                        continue;
                    }
                }
            };
            changes.insert("title".into(), Value::from(new_title));
            changes.insert("description".into(), Value::from(description));
        }

        if options.dry_run {
            info!("[dry-run] {}: {}列を更新予定", id, changes.len());
            summary.planned.push((id, changes));
            continue;
        }

        match store.update(&id, &changes).await {
            Ok(()) => {
                info!("✔ 更新: {}", id);
                summary.updated += 1;
                summary.planned.push((id, changes));
            }
            Err(e) => {
                error!("{}: 更新失敗: {}", id, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
