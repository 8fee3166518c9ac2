//! 評価ルーブリック定義
//!
//! 評価モード（quick sketch / full realism）ごとの評価項目を静的テーブルで持つ。
//! full realism は quick sketch の4項目に4項目を加えた上位集合。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// スコアの下限
pub const SCORE_MIN: i64 = 1;
/// スコアの上限
pub const SCORE_MAX: i64 = 20;

/// 評価項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    ProportionAndStructure,
    LineQuality,
    ValueAndLight,
    DetailAndTexture,
    CompositionAndPerspective,
    FormAndVolume,
    MoodAndExpression,
    OverallRealism,
}

impl Criterion {
    /// ルーブリック順の全項目
    pub const ALL: [Criterion; 8] = [
        Criterion::ProportionAndStructure,
        Criterion::LineQuality,
        Criterion::ValueAndLight,
        Criterion::DetailAndTexture,
        Criterion::CompositionAndPerspective,
        Criterion::FormAndVolume,
        Criterion::MoodAndExpression,
        Criterion::OverallRealism,
    ];

    /// 構造化出力・レポート列で使うキー
    pub fn key(self) -> &'static str {
        match self {
            Criterion::ProportionAndStructure => "proportion_and_structure",
            Criterion::LineQuality => "line_quality",
            Criterion::ValueAndLight => "value_and_light",
            Criterion::DetailAndTexture => "detail_and_texture",
            Criterion::CompositionAndPerspective => "composition_and_perspective",
            Criterion::FormAndVolume => "form_and_volume",
            Criterion::MoodAndExpression => "mood_and_expression",
            Criterion::OverallRealism => "overall_realism",
        }
    }

    /// 表示ラベル
    pub fn label(self) -> &'static str {
        match self {
            Criterion::ProportionAndStructure => "Proportion & Structure",
            Criterion::LineQuality => "Line Quality",
            Criterion::ValueAndLight => "Value & Light",
            Criterion::DetailAndTexture => "Detail & Texture",
            Criterion::CompositionAndPerspective => "Composition & Perspective",
            Criterion::FormAndVolume => "Form & Volume",
            Criterion::MoodAndExpression => "Mood & Expression",
            Criterion::OverallRealism => "Overall Realism",
        }
    }

    /// データストアの列名プレフィックス（`{column}_score` など）
    pub fn column(self) -> &'static str {
        match self {
            Criterion::ProportionAndStructure => "proportion",
            Criterion::LineQuality => "line_quality",
            Criterion::ValueAndLight => "value_light",
            Criterion::DetailAndTexture => "detail_texture",
            Criterion::CompositionAndPerspective => "composition_perspective",
            Criterion::FormAndVolume => "form_volume",
            Criterion::MoodAndExpression => "mood_expression",
            Criterion::OverallRealism => "overall_realism",
        }
    }

    /// プロンプトに載せる評価観点
    pub fn question(self) -> &'static str {
        match self {
            Criterion::ProportionAndStructure => {
                "Are the relative sizes and shapes of elements accurate and well-constructed?"
            }
            Criterion::LineQuality => {
                "Are the lines confident, controlled, and varied to define form, contour, or texture effectively?"
            }
            Criterion::ValueAndLight => {
                "Is there effective use of shading and light to create realistic depth, contrast, and form?"
            }
            Criterion::DetailAndTexture => {
                "Are the textures believable and appropriate for the subject? Is the level of detail well-judged?"
            }
            Criterion::CompositionAndPerspective => {
                "Is the placement of elements balanced? Is perspective applied accurately?"
            }
            Criterion::FormAndVolume => {
                "Does the drawing feel three-dimensional? Are forms convincingly modeled through shading or structure?"
            }
            Criterion::MoodAndExpression => {
                "Does the image evoke a mood, emotion, or atmosphere, even subtly?"
            }
            Criterion::OverallRealism => {
                "How realistic is the overall sketch in terms of visual believability and execution?"
            }
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const QUICK_SKETCH_CRITERIA: [Criterion; 4] = [
    Criterion::ProportionAndStructure,
    Criterion::LineQuality,
    Criterion::FormAndVolume,
    Criterion::MoodAndExpression,
];

/// 評価モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SketchType {
    #[serde(rename = "quick sketch")]
    QuickSketch,
    #[default]
    #[serde(rename = "full realism")]
    FullRealism,
}

impl SketchType {
    pub const ALL: [SketchType; 2] = [SketchType::QuickSketch, SketchType::FullRealism];

    pub fn as_str(self) -> &'static str {
        match self {
            SketchType::QuickSketch => "quick sketch",
            SketchType::FullRealism => "full realism",
        }
    }

    /// このモードで採点する項目（ルーブリック順）
    pub fn criteria(self) -> &'static [Criterion] {
        match self {
            SketchType::QuickSketch => &QUICK_SKETCH_CRITERIA,
            SketchType::FullRealism => &Criterion::ALL,
        }
    }

    pub fn includes(self, criterion: Criterion) -> bool {
        self.criteria().contains(&criterion)
    }

    /// 不明な値は full realism として扱う（旧データ互換）
    pub fn parse_lossy(value: &str) -> Self {
        match value.parse() {
            Ok(sketch_type) => sketch_type,
            Err(_) => {
                if !value.trim().is_empty() {
                    warn!("不明な sketch_type を full realism として扱います: {}", value);
                }
                SketchType::default()
            }
        }
    }
}

impl FromStr for SketchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "quick sketch" | "quick" => Ok(SketchType::QuickSketch),
            "full realism" | "full" | "realism" => Ok(SketchType::FullRealism),
            _ => Err(format!(
                "Unknown sketch type: {}. Use \"quick sketch\" or \"full realism\"",
                s
            )),
        }
    }
}

impl fmt::Display for SketchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
