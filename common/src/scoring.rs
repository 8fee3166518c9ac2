//! スコア変換
//!
//! 1〜20 の生スコアを 0〜10 のカーブスコアへ変換し、平均と前回評価との差分を計算する。
//! 平均カーブスコアは「生スコア平均にカーブを適用した値」であり、
//! 項目ごとのカーブスコアの平均ではない。

use crate::rubric::Criterion;
use crate::types::Evaluation;
use serde::{Deserialize, Serialize};

/// カーブスコアの上限
pub const CURVED_MAX: f64 = 10.0;

/// クランプ付き線形カーブ: `score >= high` なら 10、それ以外は `max(0, score - low)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCurve {
    pub high: f64,
    pub low: f64,
}

impl ScoreCurve {
    /// 現行カーブ
    pub const CURRENT: ScoreCurve = ScoreCurve { high: 16.0, low: 6.0 };
    /// 旧カーブ（過去のレポートとの比較用）
    pub const LEGACY: ScoreCurve = ScoreCurve { high: 18.0, low: 8.0 };

    /// 単調かつ 0〜10 に収まる閾値か
    ///
    /// `high - low` が 10 を超えると `high` 直前で 10 を超え、0 以下だと逆転する。
    pub fn is_valid(&self) -> bool {
        self.high.is_finite()
            && self.low.is_finite()
            && self.high > self.low
            && self.high - self.low <= CURVED_MAX
    }

    pub fn apply(&self, score: f64) -> f64 {
        if score >= self.high {
            CURVED_MAX
        } else {
            (score - self.low).max(0.0)
        }
    }
}

impl Default for ScoreCurve {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// 項目ごとのスコア
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub raw: i64,
    pub curved: f64,
}

/// 1評価の集計
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreSummary {
    pub criteria: Vec<CriterionScore>,
    /// 項目がひとつもない場合は None
    pub average_raw: Option<f64>,
    pub average_curved: Option<f64>,
}

impl ScoreSummary {
    pub fn curved(&self, criterion: Criterion) -> Option<f64> {
        self.criteria
            .iter()
            .find(|s| s.criterion == criterion)
            .map(|s| s.curved)
    }
}

/// 存在する項目の生スコア平均
pub fn average_score(evaluation: &Evaluation) -> Option<f64> {
    let scores: Vec<i64> = evaluation.present().map(|(_, r)| r.score).collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<i64>() as f64 / scores.len() as f64)
}

pub fn summarize(evaluation: &Evaluation, curve: ScoreCurve) -> ScoreSummary {
    let criteria = evaluation
        .present()
        .map(|(criterion, result)| CriterionScore {
            criterion,
            raw: result.score,
            curved: curve.apply(result.score as f64),
        })
        .collect();

    let average_raw = average_score(evaluation);
    ScoreSummary {
        criteria,
        average_raw,
        average_curved: average_raw.map(|avg| curve.apply(avg)),
    }
}

/// 項目ごとの差分
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionDelta {
    pub criterion: Criterion,
    pub existing: i64,
    pub new: i64,
    pub diff: i64,
}

/// 新旧評価の比較
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreComparison {
    pub existing: ScoreSummary,
    pub new: ScoreSummary,
    /// 両方に存在する項目のみ
    pub criteria: Vec<CriterionDelta>,
    pub average_diff: Option<f64>,
    pub average_curved_diff: Option<f64>,
}

impl ScoreComparison {
    pub fn diff(&self, criterion: Criterion) -> Option<i64> {
        self.criteria
            .iter()
            .find(|d| d.criterion == criterion)
            .map(|d| d.diff)
    }
}

/// 新評価 − 既存評価
pub fn compare(new: &Evaluation, existing: &Evaluation, curve: ScoreCurve) -> ScoreComparison {
    let criteria = Criterion::ALL
        .into_iter()
        .filter_map(|c| match (existing.score(c), new.score(c)) {
            (Some(old), Some(new_score)) => Some(CriterionDelta {
                criterion: c,
                existing: old,
                new: new_score,
                diff: new_score - old,
            }),
            _ => None,
        })
        .collect();

    let existing_summary = summarize(existing, curve);
    let new_summary = summarize(new, curve);

    let average_diff = match (new_summary.average_raw, existing_summary.average_raw) {
        (Some(n), Some(e)) => Some(n - e),
        _ => None,
    };
    let average_curved_diff = match (new_summary.average_curved, existing_summary.average_curved) {
        (Some(n), Some(e)) => Some(n - e),
        _ => None,
    };

    ScoreComparison {
        existing: existing_summary,
        new: new_summary,
        criteria,
        average_diff,
        average_curved_diff,
    }
}
