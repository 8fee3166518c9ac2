//! 評価結果とデータストア行の相互変換
//!
//! ネストした評価結果を横持ちの1行（`{column}_score` / `_rationale` / `_tips`）へ
//! 平坦化し、読み込み時に逆変換する。存在しない項目は列を出力しない。

use crate::error::{Error, Result};
use crate::rubric::{Criterion, SketchType};
use crate::types::{Artwork, CriterionResult, Evaluation, EvaluationRecord, NewArtwork};
use serde_json::Value;

/// データストアの1行
pub type Row = serde_json::Map<String, Value>;

pub fn score_column(criterion: Criterion) -> String {
    format!("{}_score", criterion.column())
}

pub fn rationale_column(criterion: Criterion) -> String {
    format!("{}_rationale", criterion.column())
}

pub fn tips_column(criterion: Criterion) -> String {
    format!("{}_tips", criterion.column())
}

/// 評価項目の列だけを出力
pub fn flatten_criteria(evaluation: &Evaluation) -> Row {
    let mut row = Row::new();
    for (criterion, result) in evaluation.present() {
        row.insert(score_column(criterion), Value::from(result.score));
        row.insert(rationale_column(criterion), Value::from(result.rationale.clone()));
        row.insert(
            tips_column(criterion),
            Value::from(result.improvement_tips.clone()),
        );
    }
    row
}

/// レコードを横持ちの行へ変換
pub fn flatten(record: &EvaluationRecord) -> Row {
    let mut row = flatten_criteria(&record.evaluation);
    if let Some(id) = &record.artwork_id {
        row.insert("id".to_string(), Value::from(id.clone()));
    }
    row.insert(
        "title".to_string(),
        Value::from(record.evaluation.generated_title.clone()),
    );
    row.insert(
        "sketch_type".to_string(),
        Value::from(record.sketch_type.as_str()),
    );
    row
}

/// 横持ちの行からレコードを復元
///
/// `{column}_score` が数値として存在する項目だけを復元する。講評・ヒントが
/// 欠けていれば空で補う。`sketch_type` がない旧データは full realism とみなす。
pub fn unflatten(row: &Row) -> EvaluationRecord {
    let mut evaluation = Evaluation::new(text_field(row, "title"));

    for criterion in Criterion::ALL {
        let Some(score) = row.get(&score_column(criterion)).and_then(score_value) else {
            continue;
        };
        evaluation.set(
            criterion,
            CriterionResult {
                score,
                rationale: text_field(row, &rationale_column(criterion)),
                improvement_tips: row
                    .get(&tips_column(criterion))
                    .map(tips_value)
                    .unwrap_or_default(),
            },
        );
    }

    EvaluationRecord {
        artwork_id: optional_text_field(row, "id"),
        sketch_type: optional_text_field(row, "sketch_type")
            .map(|s| SketchType::parse_lossy(&s))
            .unwrap_or_default(),
        evaluation,
    }
}

fn score_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

fn tips_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Value::String(s) => s
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn optional_text_field(row: &Row, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn text_field(row: &Row, key: &str) -> String {
    optional_text_field(row, key).unwrap_or_default()
}

impl Artwork {
    /// データストアの行から読み込む（`id` は必須）
    pub fn from_row(row: &Row) -> Result<Self> {
        let record = unflatten(row);
        let id = record
            .artwork_id
            .ok_or_else(|| Error::InvalidRow("id がありません".into()))?;

        Ok(Artwork {
            id,
            title: text_field(row, "title"),
            description: text_field(row, "description"),
            artist_name: text_field(row, "artist_name"),
            created_at: text_field(row, "created_at"),
            artwork_date: optional_text_field(row, "artwork_date"),
            image_url: text_field(row, "image_url"),
            image_public_id: text_field(row, "image_public_id"),
            sketch_type: record.sketch_type,
            question: optional_text_field(row, "question"),
            gpt_response: optional_text_field(row, "gpt_response"),
            evaluation_version: optional_text_field(row, "evaluation_version"),
            evaluation: record.evaluation,
        })
    }
}

impl NewArtwork {
    /// 挿入用の行へ変換
    pub fn to_row(&self) -> Row {
        let mut row = flatten(&EvaluationRecord {
            artwork_id: None,
            sketch_type: self.sketch_type,
            evaluation: self.evaluation.clone(),
        });

        let optional = |v: &Option<String>| v.clone().map(Value::from).unwrap_or(Value::Null);
        row.insert("title".into(), Value::from(self.title.clone()));
        row.insert("description".into(), Value::from(self.description.clone()));
        row.insert("artist_name".into(), Value::from(self.artist_name.clone()));
        row.insert("created_at".into(), Value::from(self.created_at.clone()));
        row.insert("artwork_date".into(), optional(&self.artwork_date));
        row.insert("image_url".into(), Value::from(self.image_url.clone()));
        row.insert("image_public_id".into(), Value::from(self.image_public_id.clone()));
        row.insert("question".into(), optional(&self.question));
        row.insert("gpt_response".into(), optional(&self.gpt_response));
        row.insert("evaluation_version".into(), optional(&self.evaluation_version));
        row
    }
}

impl Artwork {
    /// ID付きの行へ変換
    pub fn to_row(&self) -> Row {
        let mut row = NewArtwork::from(self).to_row();
        row.insert("id".into(), Value::from(self.id.clone()));
        row
    }
}
