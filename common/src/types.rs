//! 評価結果の型定義
//!
//! - CriterionResult: 1項目分のスコア・講評・改善ヒント
//! - Evaluation: 評価モデルの出力（項目ごとに Option で保持）
//! - EvaluationRecord: 保存単位（アートワークID・評価モード付き）
//! - Artwork / NewArtwork: データストアの行に対応するメタデータ付き型

use crate::rubric::{Criterion, SketchType};
use serde::{Deserialize, Serialize};

/// 1項目の評価
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionResult {
    pub score: i64,
    pub rationale: String,
    pub improvement_tips: Vec<String>,
}

impl CriterionResult {
    pub fn new(score: i64, rationale: impl Into<String>, improvement_tips: Vec<String>) -> Self {
        Self {
            score,
            rationale: rationale.into(),
            improvement_tips,
        }
    }
}

/// 評価モデルの出力
///
/// 項目の有無は Option で表す。quick sketch の評価には full realism 専用の
/// 4項目が存在しない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub generated_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proportion_and_structure: Option<CriterionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_quality: Option<CriterionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_and_light: Option<CriterionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_and_texture: Option<CriterionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition_and_perspective: Option<CriterionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_and_volume: Option<CriterionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_and_expression: Option<CriterionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_realism: Option<CriterionResult>,
}

impl Evaluation {
    pub fn new(generated_title: impl Into<String>) -> Self {
        Self {
            generated_title: generated_title.into(),
            ..Default::default()
        }
    }

    fn slot(&self, criterion: Criterion) -> &Option<CriterionResult> {
        match criterion {
            Criterion::ProportionAndStructure => &self.proportion_and_structure,
            Criterion::LineQuality => &self.line_quality,
            Criterion::ValueAndLight => &self.value_and_light,
            Criterion::DetailAndTexture => &self.detail_and_texture,
            Criterion::CompositionAndPerspective => &self.composition_and_perspective,
            Criterion::FormAndVolume => &self.form_and_volume,
            Criterion::MoodAndExpression => &self.mood_and_expression,
            Criterion::OverallRealism => &self.overall_realism,
        }
    }

    fn slot_mut(&mut self, criterion: Criterion) -> &mut Option<CriterionResult> {
        match criterion {
            Criterion::ProportionAndStructure => &mut self.proportion_and_structure,
            Criterion::LineQuality => &mut self.line_quality,
            Criterion::ValueAndLight => &mut self.value_and_light,
            Criterion::DetailAndTexture => &mut self.detail_and_texture,
            Criterion::CompositionAndPerspective => &mut self.composition_and_perspective,
            Criterion::FormAndVolume => &mut self.form_and_volume,
            Criterion::MoodAndExpression => &mut self.mood_and_expression,
            Criterion::OverallRealism => &mut self.overall_realism,
        }
    }

    pub fn get(&self, criterion: Criterion) -> Option<&CriterionResult> {
        self.slot(criterion).as_ref()
    }

    pub fn set(&mut self, criterion: Criterion, result: CriterionResult) {
        *self.slot_mut(criterion) = Some(result);
    }

    pub fn remove(&mut self, criterion: Criterion) -> Option<CriterionResult> {
        self.slot_mut(criterion).take()
    }

    /// ビルダー形式で項目を追加
    pub fn with(mut self, criterion: Criterion, result: CriterionResult) -> Self {
        self.set(criterion, result);
        self
    }

    /// 存在する項目をルーブリック順に列挙
    pub fn present(&self) -> impl Iterator<Item = (Criterion, &CriterionResult)> + '_ {
        Criterion::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|r| (c, r)))
    }

    pub fn criteria(&self) -> Vec<Criterion> {
        self.present().map(|(c, _)| c).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    pub fn score(&self, criterion: Criterion) -> Option<i64> {
        self.get(criterion).map(|r| r.score)
    }

    /// 指定モードで必要なのに欠けている項目
    pub fn missing_for(&self, sketch_type: SketchType) -> Vec<Criterion> {
        sketch_type
            .criteria()
            .iter()
            .copied()
            .filter(|c| self.get(*c).is_none())
            .collect()
    }

    /// 指定モードに含まれない項目
    pub fn extra_for(&self, sketch_type: SketchType) -> Vec<Criterion> {
        self.present()
            .map(|(c, _)| c)
            .filter(|c| !sketch_type.includes(*c))
            .collect()
    }
}

/// 保存単位の評価レコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub artwork_id: Option<String>,
    pub sketch_type: SketchType,
    pub evaluation: Evaluation,
}

/// データストアから読み込んだアートワーク
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub description: String,
    pub artist_name: String,
    pub created_at: String,
    pub artwork_date: Option<String>,
    pub image_url: String,
    pub image_public_id: String,
    pub sketch_type: SketchType,
    pub question: Option<String>,
    pub gpt_response: Option<String>,
    pub evaluation_version: Option<String>,
    pub evaluation: Evaluation,
}

impl Artwork {
    pub fn record(&self) -> EvaluationRecord {
        EvaluationRecord {
            artwork_id: Some(self.id.clone()),
            sketch_type: self.sketch_type,
            evaluation: self.evaluation.clone(),
        }
    }
}

/// 新規登録するアートワーク（IDはデータストアが採番）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewArtwork {
    pub title: String,
    pub description: String,
    pub artist_name: String,
    pub created_at: String,
    pub artwork_date: Option<String>,
    pub image_url: String,
    pub image_public_id: String,
    pub sketch_type: SketchType,
    pub question: Option<String>,
    pub gpt_response: Option<String>,
    pub evaluation_version: Option<String>,
    pub evaluation: Evaluation,
}

impl NewArtwork {
    /// データストアが採番したIDを付けて Artwork にする
    pub fn into_artwork(self, id: impl Into<String>) -> Artwork {
        Artwork {
            id: id.into(),
            title: self.title,
            description: self.description,
            artist_name: self.artist_name,
            created_at: self.created_at,
            artwork_date: self.artwork_date,
            image_url: self.image_url,
            image_public_id: self.image_public_id,
            sketch_type: self.sketch_type,
            question: self.question,
            gpt_response: self.gpt_response,
            evaluation_version: self.evaluation_version,
            evaluation: self.evaluation,
        }
    }
}

impl From<&Artwork> for NewArtwork {
    fn from(artwork: &Artwork) -> Self {
        NewArtwork {
            title: artwork.title.clone(),
            description: artwork.description.clone(),
            artist_name: artwork.artist_name.clone(),
            created_at: artwork.created_at.clone(),
            artwork_date: artwork.artwork_date.clone(),
            image_url: artwork.image_url.clone(),
            image_public_id: artwork.image_public_id.clone(),
            sketch_type: artwork.sketch_type,
            question: artwork.question.clone(),
            gpt_response: artwork.gpt_response.clone(),
            evaluation_version: artwork.evaluation_version.clone(),
            evaluation: artwork.evaluation.clone(),
        }
    }
}
