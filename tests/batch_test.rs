//! 再評価バッチの統合テスト
//!
//! インメモリの評価器・データストアで件数制限・スキップ・レポート生成を検証

use sketch_critique::batch::{run_batch, BatchOptions};
use sketch_critique::fake::{FakeArtworkStore, FakeEvaluator, FakeImageStore};
use sketch_critique_common::{
    build_report, Artwork, Cell, Criterion, CriterionResult, Evaluation, ScoreCurve, SketchType,
};
use std::time::Duration;

fn stored_artwork(index: usize, sketch_type: SketchType) -> Artwork {
    let evaluation = sketch_type
        .criteria()
        .iter()
        .fold(Evaluation::new(format!("Study {}", index)), |e, c| {
            e.with(*c, CriterionResult::new(10, "Earlier rationale.", vec!["Earlier tip".into()]))
        });

    Artwork {
        id: format!("art-{}", index),
        title: format!("Study {}", index),
        artist_name: "Rin".into(),
        created_at: format!("2025-01-{:02}T09:00:00", index),
        image_url: format!("https://cdn.example/{}.png", index),
        sketch_type,
        evaluation,
        ..Default::default()
    }
}

fn store_with(count: usize) -> FakeArtworkStore {
    FakeArtworkStore::with_artworks(
        (1..=count)
            .map(|i| stored_artwork(i, SketchType::QuickSketch))
            .collect(),
    )
}

fn options(limit: usize) -> BatchOptions {
    BatchOptions {
        sketch_type: SketchType::QuickSketch,
        limit,
        delay: Duration::ZERO,
        ..Default::default()
    }
}

/// limit=0 は全件を評価する
#[tokio::test]
async fn test_limit_zero_processes_all() {
    let store = store_with(8);
    let evaluator = FakeEvaluator::new(14);

    let outcome = run_batch(&evaluator, &FakeImageStore::new(), &store, &options(0))
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 8);
    assert_eq!(outcome.attempted, 8);
    assert_eq!(evaluator.call_count(), 8);
}

/// 既定の limit=5 は新しい順に5件まで
#[tokio::test]
async fn test_default_limit_processes_newest_five() {
    let store = store_with(8);
    let evaluator = FakeEvaluator::new(14);

    let outcome = run_batch(&evaluator, &FakeImageStore::new(), &store, &BatchOptions {
        delay: Duration::ZERO,
        sketch_type: SketchType::QuickSketch,
        ..Default::default()
    })
    .await
    .unwrap();

    let ids: Vec<&str> = outcome.results.iter().map(|r| r.artwork.id.as_str()).collect();
    assert_eq!(ids, vec!["art-8", "art-7", "art-6", "art-5", "art-4"]);
    assert_eq!(evaluator.call_count(), 5);
}

/// 評価失敗・画像なしの作品はスキップして続行する
#[tokio::test]
async fn test_failures_are_skipped() {
    let mut artworks: Vec<Artwork> = (1..=3).map(|i| stored_artwork(i, SketchType::QuickSketch)).collect();
    artworks[0].image_url.clear();
    let store = FakeArtworkStore::with_artworks(artworks);

    let evaluator = FakeEvaluator::new(12);
    evaluator.fake_fail_image("https://cdn.example/2.png");

    let outcome = run_batch(&evaluator, &FakeImageStore::new(), &store, &options(0))
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].artwork.id, "art-3");
    assert_eq!(outcome.failures.len(), 2);
    // 画像のない作品は評価APIを呼ばない
    assert_eq!(evaluator.call_count(), 2);
}

/// 公開IDしかない作品は配信URLで評価する
#[tokio::test]
async fn test_public_id_fallback_url() {
    let mut artwork = stored_artwork(1, SketchType::QuickSketch);
    artwork.image_url.clear();
    artwork.image_public_id = "artwork/one".into();
    let store = FakeArtworkStore::with_artworks(vec![artwork]);
    let evaluator = FakeEvaluator::new(12);

    run_batch(&evaluator, &FakeImageStore::new(), &store, &options(0))
        .await
        .unwrap();

    assert_eq!(
        evaluator.calls()[0].image.as_str(),
        "https://fake.cdn/image/upload/artwork/one"
    );
}

/// バッチはデータストアを変更しない
#[tokio::test]
async fn test_batch_does_not_mutate_store() {
    let store = store_with(3);
    let before = store.artworks();

    run_batch(&FakeEvaluator::new(18), &FakeImageStore::new(), &store, &options(0))
        .await
        .unwrap();

    assert_eq!(store.artworks(), before);
}

/// カスタムプロンプトが評価リクエストに渡る
#[tokio::test]
async fn test_custom_instructions_forwarded() {
    let store = store_with(1);
    let evaluator = FakeEvaluator::new(12);

    run_batch(&evaluator, &FakeImageStore::new(), &store, &BatchOptions {
        custom_instructions: Some("Score harshly.".into()),
        ..options(0)
    })
    .await
    .unwrap();

    assert_eq!(evaluator.calls()[0].system_prompt(), "Score harshly.");
}

/// バッチ結果から比較レポートを作る
#[tokio::test]
async fn test_batch_report_diffs() {
    let store = store_with(2);
    let outcome = run_batch(&FakeEvaluator::new(14), &FakeImageStore::new(), &store, &options(0))
        .await
        .unwrap();

    let report = build_report(&outcome.results, SketchType::QuickSketch, ScoreCurve::CURRENT);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.cell(0, "line_quality_score_diff"), Some(&Cell::Int(4)));
    assert_eq!(report.cell(0, "average_score_diff"), Some(&Cell::Float(4.0)));
    // 10 → 4、14 → 8
    assert_eq!(report.cell(0, "average_curved_score_diff"), Some(&Cell::Float(4.0)));
    assert_eq!(report.cell(0, "generated_title"), Some(&Cell::Text("Fake Title".into())));
    assert!(report.column_index("new_overall_realism_score").is_none());

    let first = &outcome.results[0];
    assert_eq!(
        first.new_evaluation.get(Criterion::MoodAndExpression).map(|r| r.improvement_tips.len()),
        Some(2)
    );
}
