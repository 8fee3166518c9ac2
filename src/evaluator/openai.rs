//! OpenAI Responses API による画像評価
//!
//! 構造化出力（json_schema, strict）で評価JSONを受け取り、
//! 共通ライブラリのパーサーで検証する。

use super::{EvaluationOutcome, EvaluationRequest, Evaluator};
use crate::error::{Result, SketchCritiqueError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use sketch_critique_common::{parse_evaluation_response, response_format};
use std::time::Duration;
use tracing::debug;

pub const RESPONSES_ENDPOINT: &str = "https://api.openai.com/v1/responses";

pub struct OpenAiEvaluator {
    client: Client,
    /// `"Bearer <key>"` を事前計算
    auth_header: String,
    model: String,
}

impl OpenAiEvaluator {
    pub fn new(api_key: &str, model: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            auth_header: format!("Bearer {}", api_key),
            model: model.into(),
        })
    }
}

/// Responses API のリクエストボディ
pub fn build_request_body(model: &str, request: &EvaluationRequest) -> Value {
    json!({
        "model": model,
        "input": [
            {
                "role": "system",
                "content": [
                    { "type": "input_text", "text": request.system_prompt() }
                ]
            },
            {
                "role": "user",
                "content": [
                    { "type": "input_text", "text": request.user_prompt() },
                    { "type": "input_image", "image_url": request.image.as_str() }
                ]
            }
        ],
        "text": {
            "format": response_format(request.sketch_type)
        }
    })
}

/// レスポンスから出力テキストを取り出す
///
/// `output[].content[]` の `output_text` を連結する。拒否応答はエラー。
pub fn extract_output_text(response: &Value) -> Result<String> {
    let mut text = String::new();

    for item in response["output"].as_array().into_iter().flatten() {
        for content in item["content"].as_array().into_iter().flatten() {
            match content["type"].as_str() {
                Some("output_text") => {
                    if let Some(t) = content["text"].as_str() {
                        text.push_str(t);
                    }
                }
                Some("refusal") => {
                    let reason = content["refusal"].as_str().unwrap_or("refused");
                    return Err(SketchCritiqueError::ApiCall(format!("評価を拒否されました: {}", reason)));
                }
                _ => {}
            }
        }
    }

    // SDK互換の集約フィールド
    if text.is_empty() {
        if let Some(t) = response["output_text"].as_str() {
            text.push_str(t);
        }
    }

    if text.trim().is_empty() {
        return Err(SketchCritiqueError::ApiCall("出力テキストがありません".into()));
    }
    Ok(text)
}

#[async_trait]
impl Evaluator for OpenAiEvaluator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationOutcome> {
        let body = build_request_body(&self.model, request);
        debug!(model = %self.model, sketch_type = %request.sketch_type, "評価リクエスト送信");

        let response = self
            .client
            .post(RESPONSES_ENDPOINT)
            .header("Authorization", &self.auth_header)
            .json(&body)
            .send()
            .await
            .map_err(|e| SketchCritiqueError::ApiCall(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SketchCritiqueError::ApiCall(format!("HTTP {}: {}", status, detail.trim())));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SketchCritiqueError::ApiCall(format!("レスポンス解析エラー: {}", e)))?;

        let raw_response = extract_output_text(&payload)?;
        let evaluation = parse_evaluation_response(&raw_response, request.sketch_type)?;

        Ok(EvaluationOutcome {
            evaluation,
            raw_response,
        })
    }
}
