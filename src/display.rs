//! コンソール表示
//!
//! 評価モードに応じた項目だけを、ルーブリック順に表示する。

use sketch_critique_common::scoring::summarize;
use sketch_critique_common::{Artwork, Evaluation, ScoreCurve, SketchType, SCORE_MAX};
use std::fmt::Write;

fn format_average(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())
}

/// 評価本体（項目ごとのスコア・講評・ヒントと平均）
pub fn render_evaluation(evaluation: &Evaluation, sketch_type: SketchType, curve: ScoreCurve) -> String {
    if evaluation.is_empty() {
        return "スコアはまだありません\n".to_string();
    }

    let summary = summarize(evaluation, curve);
    let mut out = String::new();

    for (criterion, result) in evaluation.present() {
        let curved = summary.curved(criterion).unwrap_or_default();
        let _ = writeln!(
            out,
            "■ {}  {}/{}  (curved {:.1}/10)",
            criterion.label(),
            result.score,
            SCORE_MAX,
            curved
        );
        if !result.rationale.is_empty() {
            let _ = writeln!(out, "  {}", result.rationale);
        }
        for tip in &result.improvement_tips {
            let _ = writeln!(out, "  - {}", tip);
        }
    }

    let missing = evaluation.missing_for(sketch_type);
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|c| c.label()).collect();
        let _ = writeln!(out, "未評価: {}", labels.join(", "));
    }

    let _ = writeln!(
        out,
        "平均: {} / {}  (curved {} / 10)",
        format_average(summary.average_raw),
        SCORE_MAX,
        format_average(summary.average_curved)
    );
    out
}

/// アートワーク1件の詳細
pub fn render_artwork(artwork: &Artwork, curve: ScoreCurve) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", artwork.title);
    let _ = writeln!(out, "  ID: {}", artwork.id);
    let _ = writeln!(
        out,
        "  作者: {}",
        if artwork.artist_name.is_empty() { "-" } else { &artwork.artist_name }
    );
    let _ = writeln!(out, "  種類: {}", artwork.sketch_type);
    let _ = writeln!(out, "  登録日時: {}", artwork.created_at);
    if let Some(date) = &artwork.artwork_date {
        let _ = writeln!(out, "  制作日: {}", date);
    }
    if !artwork.description.is_empty() {
        let _ = writeln!(out, "  説明: {}", artwork.description);
    }
    if !artwork.image_url.is_empty() {
        let _ = writeln!(out, "  画像: {}", artwork.image_url);
    }
    if let Some(version) = &artwork.evaluation_version {
        let _ = writeln!(out, "  評価モデル: {}", version);
    }
    out.push('\n');
    out.push_str(&render_evaluation(&artwork.evaluation, artwork.sketch_type, curve));
    out
}

/// 一覧（1行1件）
pub fn render_artwork_list(artworks: &[Artwork], curve: ScoreCurve) -> String {
    if artworks.is_empty() {
        return "評価済みのアートワークはありません\n".to_string();
    }

    let mut out = String::new();
    for artwork in artworks {
        let summary = summarize(&artwork.evaluation, curve);
        let date = artwork.created_at.get(..10).unwrap_or(&artwork.created_at);
        let _ = writeln!(
            out,
            "{}  {}  {:<32}  {:<14}  {:>4}/10  {}",
            date,
            artwork.sketch_type,
            artwork.title,
            if artwork.artist_name.is_empty() { "-" } else { &artwork.artist_name },
            format_average(summary.average_curved),
            artwork.id
        );
    }
    out
}
