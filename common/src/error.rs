//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// 評価モデルの応答がスキーマに合わない（生の応答を保持）
    #[error("Response shape error: {message}")]
    ResponseShape { message: String, raw: String },

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl Error {
    /// 応答形式エラーの場合、モデルの生レスポンスを返す
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::ResponseShape { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
