use thiserror::Error;

#[derive(Error, Debug)]
pub enum SketchCritiqueError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("{0} が設定されていません。`sketch-critique config` または環境変数で設定してください")]
    MissingCredential(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していない画像形式です（PNG/JPEGのみ）: {0}")]
    UnsupportedImage(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("画像アップロードエラー: {0}")]
    Upload(String),

    #[error("データストアエラー: {0}")]
    Datastore(String),

    #[error("アートワークが見つかりません: {0}")]
    ArtworkNotFound(String),

    #[error("エクスポートエラー: {0}")]
    Export(String),

    #[error("レポート読み込みエラー: {0}")]
    ReportRead(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] sketch_critique_common::Error),
}

impl SketchCritiqueError {
    /// 評価モデルの生レスポンス（形式違反のとき）
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            SketchCritiqueError::Common(e) => e.raw_response(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SketchCritiqueError>;
