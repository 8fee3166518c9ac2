//! レポート反映の統合テスト
//!
//! CSVレポートを書き出して読み戻し、インメモリのデータストアへ反映する

use sketch_critique::apply::{apply_report, ApplyOptions};
use sketch_critique::export::{self, ReportRecord};
use sketch_critique::fake::FakeArtworkStore;
use sketch_critique_common::{
    build_report, Artwork, Cell, Criterion, CriterionResult, Evaluation, ReEvaluation, Report,
    ScoreCurve, SketchType,
};
use tempfile::tempdir;

fn evaluation(title: &str, score: i64, tips: &[&str]) -> Evaluation {
    SketchType::QuickSketch
        .criteria()
        .iter()
        .fold(Evaluation::new(title), |e, c| {
            e.with(
                *c,
                CriterionResult::new(
                    score,
                    format!("{} rationale", c.key()),
                    tips.iter().map(|t| t.to_string()).collect(),
                ),
            )
        })
}

fn stored_artwork(id: &str, title: &str) -> Artwork {
    Artwork {
        id: id.to_string(),
        title: title.to_string(),
        description: "Pencil study".to_string(),
        artist_name: "Rin".to_string(),
        created_at: "2025-03-01T10:00:00".to_string(),
        image_url: format!("https://cdn.example/{}.png", id),
        sketch_type: SketchType::QuickSketch,
        evaluation_version: Some("gpt-4o".to_string()),
        evaluation: evaluation(title, 10, &["Old tip"]),
        ..Default::default()
    }
}

fn report_for(artworks: &[Artwork]) -> Report {
    let results: Vec<ReEvaluation> = artworks
        .iter()
        .map(|a| ReEvaluation {
            artwork: a.clone(),
            new_evaluation: evaluation("Evening Tide", 14, &["Tip1.", "Tip2."]),
        })
        .collect();
    build_report(&results, SketchType::QuickSketch, ScoreCurve::CURRENT)
}

/// CSVに書き出して読み戻す
fn roundtrip(report: &Report) -> Vec<ReportRecord> {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("evaluation.csv");
    export::csv::write_report(report, &path).expect("CSV出力失敗");
    export::read_report(&path).expect("CSV読み込み失敗")
}

fn options(label: &str) -> ApplyOptions {
    ApplyOptions {
        retitle: false,
        dry_run: false,
        label: label.to_string(),
    }
}

/// 新スコア・講評・ヒントを反映し、タイトルは維持する
#[tokio::test]
async fn test_apply_updates_scores() {
    let store = FakeArtworkStore::with_artworks(vec![stored_artwork("a1", "Harbor")]);
    let records = roundtrip(&report_for(&store.artworks()));

    let summary = apply_report(&store, &records, &options("evaluation_gpt-4-1_20250301"))
        .await
        .expect("反映失敗");

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);

    let updated = &store.artworks()[0];
    assert_eq!(updated.title, "Harbor");
    assert_eq!(updated.description, "Pencil study");
    assert_eq!(updated.evaluation_version.as_deref(), Some("evaluation_gpt-4-1_20250301"));

    let line = updated.evaluation.get(Criterion::LineQuality).unwrap();
    assert_eq!(line.score, 14);
    assert_eq!(line.rationale, "line_quality rationale");
    assert_eq!(line.improvement_tips, vec!["Tip1", "Tip2"]);
}

/// --retitle は旧タイトルを説明に残す
#[tokio::test]
async fn test_apply_retitle() {
    let store = FakeArtworkStore::with_artworks(vec![stored_artwork("a1", "Harbor")]);
    let records = roundtrip(&report_for(&store.artworks()));

    let summary = apply_report(&store, &records, &ApplyOptions {
        retitle: true,
        ..options("v2")
    })
    .await
    .expect("反映失敗");

    assert_eq!(summary.updated, 1);
    let updated = &store.artworks()[0];
    assert_eq!(updated.title, "Evening Tide");
    assert_eq!(
        updated.description,
        "Pencil study\n\nre-evaluated; previous title: Harbor"
    );
}

/// ドライランはデータストアを変更しない
#[tokio::test]
async fn test_apply_dry_run() {
    let store = FakeArtworkStore::with_artworks(vec![stored_artwork("a1", "Harbor")]);
    let before = store.artworks();
    let records = roundtrip(&report_for(&before));

    let summary = apply_report(&store, &records, &ApplyOptions {
        dry_run: true,
        ..options("v2")
    })
    .await
    .expect("反映失敗");

    assert_eq!(summary.updated, 0);
    assert_eq!(summary.planned.len(), 1);
    assert_eq!(summary.planned[0].0, "a1");
    assert_eq!(summary.planned[0].1["line_quality_score"], serde_json::json!(14));
    assert_eq!(store.artworks(), before);
}

/// ドライランの --retitle はデータストアを参照せずに変更内容を示す
#[tokio::test]
async fn test_apply_dry_run_retitle_without_store() {
    let store = FakeArtworkStore::new();
    let records = roundtrip(&report_for(&[stored_artwork("a1", "Harbor")]));

    let summary = apply_report(&store, &records, &ApplyOptions {
        retitle: true,
        dry_run: true,
        ..options("v2")
    })
    .await
    .expect("反映失敗");

    assert_eq!(summary.failed, 0);
    assert_eq!(summary.planned.len(), 1);

    let (id, changes) = &summary.planned[0];
    assert_eq!(id, "a1");
    assert_eq!(changes["title"], serde_json::json!("Evening Tide"));
    assert_eq!(
        changes["description"],
        serde_json::json!("re-evaluated; previous title: Harbor")
    );
    assert!(store.artworks().is_empty());
}

/// IDのない行はスキップ、更新失敗は数えて続行
#[tokio::test]
async fn test_apply_skips_and_failures() {
    let store = FakeArtworkStore::with_artworks(vec![
        stored_artwork("a1", "Harbor"),
        stored_artwork("a2", "Dunes"),
    ]);
    store.fake_fail_update("a1");

    let mut report = report_for(&store.artworks());
    let id_col = report.column_index("id").unwrap();
    report.rows.push({
        let mut row = report.rows[0].clone();
        row[id_col] = Cell::Empty;
        row
    });
    let records = roundtrip(&report);

    let summary = apply_report(&store, &records, &options("v2"))
        .await
        .expect("反映失敗");

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);

    let a1 = store.artworks().into_iter().find(|a| a.id == "a1").unwrap();
    assert_eq!(a1.evaluation.score(Criterion::LineQuality), Some(10));
    let a2 = store.artworks().into_iter().find(|a| a.id == "a2").unwrap();
    assert_eq!(a2.evaluation.score(Criterion::LineQuality), Some(14));
}

/// 存在しないIDの更新は失敗として数える
#[tokio::test]
async fn test_apply_unknown_id() {
    let store = FakeArtworkStore::new();
    let records = roundtrip(&report_for(&[stored_artwork("ghost", "Ghost")]));

    let summary = apply_report(&store, &records, &options("v2"))
        .await
        .expect("反映失敗");

    assert_eq!(summary.updated, 0);
    assert_eq!(summary.failed, 1);
}
