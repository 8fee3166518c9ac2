//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use sketch_critique::config::resolve_credential;
use sketch_critique::error::SketchCritiqueError;
use sketch_critique::scanner;
use sketch_critique_common::{parse_evaluation_response, SketchType};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない画像を読み込んだ場合
#[test]
fn test_load_nonexistent_image() {
    let result = scanner::load_image(Path::new("/nonexistent/path/12345.png"));
    assert!(matches!(result, Err(SketchCritiqueError::FileNotFound(_))));
}

/// フォルダを画像として指定した場合
#[test]
fn test_load_directory_as_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::load_image(dir.path());
    assert!(matches!(result, Err(SketchCritiqueError::FileNotFound(_))));
}

/// 画像以外のファイルを直接指定した場合
#[test]
fn test_load_unsupported_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sketch.gif");
    std::fs::write(&path, "GIF89a").unwrap();

    assert!(matches!(
        scanner::load_image(&path),
        Err(SketchCritiqueError::UnsupportedImage(_))
    ));
}

/// SketchCritiqueErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        SketchCritiqueError::Config("テスト設定エラー".to_string()),
        SketchCritiqueError::MissingCredential("OPENAI_API_KEY".to_string()),
        SketchCritiqueError::FileNotFound("test.png".to_string()),
        SketchCritiqueError::ApiCall("API呼び出し失敗".to_string()),
        SketchCritiqueError::Upload("アップロード失敗".to_string()),
        SketchCritiqueError::Datastore("HTTP 500".to_string()),
        SketchCritiqueError::ArtworkNotFound("a1".to_string()),
        SketchCritiqueError::Export("書き込み失敗".to_string()),
        SketchCritiqueError::ReportRead("シートがありません".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 認証情報がない場合のメッセージ確認
#[test]
fn test_missing_credential_message() {
    let err = resolve_credential("CLOUDINARY_API_SECRET", None, Some("")).unwrap_err();
    let display = format!("{}", err);

    assert!(display.contains("CLOUDINARY_API_SECRET"));
    assert!(display.contains("sketch-critique config"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SketchCritiqueError = io_err.into();

    assert!(matches!(err, SketchCritiqueError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: SketchCritiqueError = json_err.into();

    assert!(matches!(err, SketchCritiqueError::JsonParse(_)));
}

/// 応答形式エラーは生レスポンスを保持したまま変換される
#[test]
fn test_response_shape_error_keeps_raw() {
    let common_err = parse_evaluation_response("Sorry, I can't rate this.", SketchType::QuickSketch)
        .unwrap_err();
    let err: SketchCritiqueError = common_err.into();

    assert!(matches!(err, SketchCritiqueError::Common(_)));
    assert_eq!(err.raw_response(), Some("Sorry, I can't rate this."));
    assert!(format!("{}", err).contains("Response shape"));
}

/// 生レスポンスを持たないエラー
#[test]
fn test_raw_response_absent() {
    let err = SketchCritiqueError::ApiCall("timeout".to_string());
    assert_eq!(err.raw_response(), None);
}
