//! 画像評価モジュール
//!
//! - Evaluator: 画像とルーブリックを渡して評価を得るトレイト
//! - OpenAiEvaluator: OpenAI Responses API 実装

mod openai;

pub use openai::{build_request_body, extract_output_text, OpenAiEvaluator, RESPONSES_ENDPOINT};

use crate::error::Result;
use async_trait::async_trait;
use sketch_critique_common::{build_system_prompt, build_user_prompt, Evaluation, SketchType};

/// 評価対象の画像
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// 公開URL（CDN）
    Url(String),
    /// `data:image/...;base64,` 形式のインライン画像
    DataUrl(String),
}

impl ImageSource {
    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::Url(url) | ImageSource::DataUrl(url) => url,
        }
    }
}

/// 1回分の評価リクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub image: ImageSource,
    pub artist_name: String,
    pub sketch_type: SketchType,
    /// 指定時は既定のシステムプロンプトを置き換える
    pub custom_instructions: Option<String>,
}

impl EvaluationRequest {
    pub fn new(image: ImageSource, artist_name: impl Into<String>, sketch_type: SketchType) -> Self {
        Self {
            image,
            artist_name: artist_name.into(),
            sketch_type,
            custom_instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.custom_instructions = instructions;
        self
    }

    pub fn system_prompt(&self) -> String {
        match &self.custom_instructions {
            Some(custom) if !custom.trim().is_empty() => custom.clone(),
            _ => build_system_prompt(self.sketch_type),
        }
    }

    pub fn user_prompt(&self) -> String {
        build_user_prompt(&self.artist_name)
    }
}

/// 評価結果と生レスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    pub evaluation: Evaluation,
    pub raw_response: String,
}

#[async_trait]
pub trait Evaluator: Send + Sync {
    /// 評価に使うモデル名（evaluation_version として保存される）
    fn model(&self) -> &str;

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationOutcome>;
}
