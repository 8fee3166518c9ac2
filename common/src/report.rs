//! 再評価レポート
//!
//! 既存評価と新評価を横並びにしたレポート行を組み立てる。
//! 列順: メタデータ → 平均スコア → 項目ごとの (既存, 新, 差分, 新講評, 新ヒント)。

use crate::rubric::{Criterion, SketchType};
use crate::scoring::{compare, ScoreCurve};
use crate::types::{Artwork, Evaluation};
use std::fmt;

/// メタデータ列
pub const METADATA_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "artist_name",
    "created_at",
    "sketch_type",
    "generated_title",
    "image_url",
];

/// 平均スコア列
pub const AVERAGE_COLUMNS: [&str; 6] = [
    "existing_average_raw_score",
    "new_average_raw_score",
    "average_score_diff",
    "existing_average_curved_score",
    "new_average_curved_score",
    "average_curved_score_diff",
];

/// ヒントを連結する区切り
pub const TIP_SEPARATOR: &str = "; ";

/// 再評価1件（既存アートワーク + 新しい評価）
#[derive(Debug, Clone, PartialEq)]
pub struct ReEvaluation {
    pub artwork: Artwork,
    pub new_evaluation: Evaluation,
}

/// レポートのセル
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    fn from_option_int(value: Option<i64>) -> Self {
        value.map(Cell::Int).unwrap_or(Cell::Empty)
    }

    fn from_option_float(value: Option<f64>) -> Self {
        value.map(Cell::Float).unwrap_or(Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            Cell::Float(v) => write!(f, "{}", v),
        }
    }
}

/// 列名と行データ
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Report {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }
}

pub fn join_tips(tips: &[String]) -> String {
    tips.join(TIP_SEPARATOR)
}

/// レポートに載せる評価項目
///
/// quick sketch の4項目は常に含め、実行モードかいずれかの行が full realism なら
/// 残りの4項目も含める。
pub fn report_criteria(sketch_type: SketchType, results: &[ReEvaluation]) -> Vec<Criterion> {
    let full = sketch_type == SketchType::FullRealism
        || results
            .iter()
            .any(|r| r.artwork.sketch_type == SketchType::FullRealism);
    if full {
        SketchType::FullRealism.criteria().to_vec()
    } else {
        SketchType::QuickSketch.criteria().to_vec()
    }
}

pub fn report_columns(criteria: &[Criterion]) -> Vec<String> {
    let mut columns: Vec<String> = METADATA_COLUMNS
        .iter()
        .chain(AVERAGE_COLUMNS.iter())
        .map(|s| s.to_string())
        .collect();

    for criterion in criteria {
        let key = criterion.key();
        columns.push(format!("existing_{}_score", key));
        columns.push(format!("new_{}_score", key));
        columns.push(format!("{}_score_diff", key));
        columns.push(format!("new_{}_rationale", key));
        columns.push(format!("new_{}_tips", key));
    }
    columns
}

/// 1件分の行（列順は `report_columns` と同じ）
pub fn build_report_row(item: &ReEvaluation, criteria: &[Criterion], curve: ScoreCurve) -> Vec<Cell> {
    let artwork = &item.artwork;
    let new = &item.new_evaluation;
    let comparison = compare(new, &artwork.evaluation, curve);

    let mut row = vec![
        Cell::Text(artwork.id.clone()),
        Cell::Text(artwork.title.clone()),
        Cell::Text(artwork.artist_name.clone()),
        Cell::Text(artwork.created_at.clone()),
        Cell::Text(artwork.sketch_type.as_str().to_string()),
        Cell::Text(new.generated_title.clone()),
        Cell::Text(artwork.image_url.clone()),
        Cell::from_option_float(comparison.existing.average_raw),
        Cell::from_option_float(comparison.new.average_raw),
        Cell::from_option_float(comparison.average_diff),
        Cell::from_option_float(comparison.existing.average_curved),
        Cell::from_option_float(comparison.new.average_curved),
        Cell::from_option_float(comparison.average_curved_diff),
    ];

    for criterion in criteria {
        let new_result = new.get(*criterion);
        row.push(Cell::from_option_int(artwork.evaluation.score(*criterion)));
        row.push(Cell::from_option_int(new_result.map(|r| r.score)));
        row.push(Cell::from_option_int(comparison.diff(*criterion)));
        row.push(
            new_result
                .map(|r| Cell::Text(r.rationale.clone()))
                .unwrap_or(Cell::Empty),
        );
        row.push(
            new_result
                .map(|r| Cell::Text(join_tips(&r.improvement_tips)))
                .unwrap_or(Cell::Empty),
        );
    }
    row
}

pub fn build_report(results: &[ReEvaluation], sketch_type: SketchType, curve: ScoreCurve) -> Report {
    let criteria = report_criteria(sketch_type, results);
    Report {
        columns: report_columns(&criteria),
        rows: results
            .iter()
            .map(|item| build_report_row(item, &criteria, curve))
            .collect(),
    }
}
