//! CSV/Excel出力の統合テスト
//!
//! ## 変更履歴
//! - 2026-10-18: 初期作成

use sketch_critique::cli::ExportFormat;
use sketch_critique::export::{self, export_report, home_fallback_path, read_report};
use sketch_critique_common::{
    build_report, Artwork, Criterion, CriterionResult, Evaluation, ReEvaluation, Report,
    ScoreCurve, SketchType,
};
use tempfile::tempdir;

fn evaluation(title: &str, score: i64) -> Evaluation {
    SketchType::QuickSketch
        .criteria()
        .iter()
        .fold(Evaluation::new(title), |e, c| {
            e.with(*c, CriterionResult::new(score, "Clean, confident lines.", vec![
                "Vary pressure.".to_string(),
                "Check angles.".to_string(),
            ]))
        })
}

fn create_test_report(count: usize) -> Report {
    let results: Vec<ReEvaluation> = (1..=count)
        .map(|i| ReEvaluation {
            artwork: Artwork {
                id: format!("art-{}", i),
                title: format!("Study {}", i),
                artist_name: "Rin".to_string(),
                created_at: "2025-03-01T10:00:00".to_string(),
                image_url: format!("https://cdn.example/{}.png", i),
                sketch_type: SketchType::QuickSketch,
                evaluation: evaluation("Old", 10),
                ..Default::default()
            },
            new_evaluation: evaluation(&format!("Morning {}", i), 14),
        })
        .collect();
    build_report(&results, SketchType::QuickSketch, ScoreCurve::CURRENT)
}

/// CSV出力と読み戻し
#[test]
fn test_export_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("reports").join("evaluation.csv");
    let report = create_test_report(3);

    let written = export_report(&report, ExportFormat::Csv, &path, None, "20250301_100000");
    assert_eq!(written, vec![path.clone()]);

    let records = read_report(&path).expect("CSV読み込み失敗");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["id"], "art-1");
    assert_eq!(records[0]["generated_title"], "Morning 1");
    assert_eq!(records[0]["new_line_quality_score"], "14");
    assert_eq!(records[0]["line_quality_score_diff"], "4");
    assert_eq!(records[0]["average_score_diff"], "4.0");
    assert_eq!(records[0]["new_line_quality_tips"], "Vary pressure.; Check angles.");
    assert!(!records[0].contains_key("new_overall_realism_score"));
}

/// Excel出力と読み戻し
#[test]
fn test_export_excel() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("evaluation.csv");
    let report = create_test_report(2);

    let written = export_report(&report, ExportFormat::Excel, &path, None, "20250301_100000");
    let xlsx = dir.path().join("evaluation.xlsx");
    assert_eq!(written, vec![xlsx.clone()]);

    let records = read_report(&xlsx).expect("Excel読み込み失敗");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["id"], "art-2");
    assert_eq!(records[1]["new_mood_and_expression_score"], "14.0");
}

/// both 指定で両形式を出力
#[test]
fn test_export_both() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("evaluation.csv");

    let written = export_report(&create_test_report(1), ExportFormat::Both, &path, None, "t");
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|p| p.exists()));
}

/// 書き込めない場合はホームディレクトリへ退避
#[test]
fn test_export_falls_back_to_home() {
    let dir = tempdir().expect("Failed to create temp dir");
    let home = tempdir().expect("Failed to create temp dir");

    // 親がファイルなのでディレクトリを作れない
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("evaluation.csv");

    let written = export_report(
        &create_test_report(1),
        ExportFormat::Csv,
        &path,
        Some(home.path()),
        "20250301_100000",
    );

    let expected = home_fallback_path(home.path(), "20250301_100000", "csv");
    assert_eq!(written, vec![expected.clone()]);
    assert!(expected.exists());
}

/// 退避先もなければ何も書き出さない
#[test]
fn test_export_gives_up_without_home() {
    let dir = tempdir().expect("Failed to create temp dir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let written = export_report(
        &create_test_report(1),
        ExportFormat::Csv,
        &blocker.join("evaluation.csv"),
        None,
        "t",
    );
    assert!(written.is_empty());
}

/// 同名ファイルが書き込めない場合はタイムスタンプ付きの別名で保存
#[test]
fn test_write_with_fallback_timestamped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("evaluation.csv");

    let written = export::write_with_fallback(&path, None, "20250301_100000", |p| {
        if p == path.as_path() {
            Err(sketch_critique::error::SketchCritiqueError::Export("locked".into()))
        } else {
            std::fs::write(p, "ok")?;
            Ok(())
        }
    });

    assert_eq!(written, Some(dir.path().join("evaluation_20250301_100000.csv")));
}

/// 存在しないレポートの読み込み
#[test]
fn test_read_missing_report() {
    let dir = tempdir().expect("Failed to create temp dir");
    assert!(read_report(&dir.path().join("missing.csv")).is_err());
}

/// 平均列は項目列より前に並ぶ
#[test]
fn test_report_column_order() {
    let report = create_test_report(1);
    let average = report.column_index("average_score_diff").unwrap();
    let first_criterion = report
        .column_index(&format!("existing_{}_score", Criterion::ProportionAndStructure.key()))
        .unwrap();
    assert!(average < first_criterion);
    assert_eq!(report.columns[0], "id");
}
