//! APIレスポンスパーサー
//!
//! 評価モデルのレスポンスからJSONを抽出し、Evaluation として検証する。
//! 形式違反はすべて `Error::ResponseShape` として生レスポンス付きで返す。

use crate::error::{Error, Result};
use crate::rubric::{SketchType, SCORE_MAX, SCORE_MIN};
use crate::types::Evaluation;

/// APIレスポンスからJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use sketch_critique_common::extract_json;
///
/// let response = "Result: {\"generated_title\": \"Dusk\"}";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

fn shape_error(message: impl Into<String>, raw: &str) -> Error {
    Error::ResponseShape {
        message: message.into(),
        raw: raw.to_string(),
    }
}

/// 評価レスポンスをパースして検証
///
/// - 指定モードの全項目が揃っていること
/// - モード外の項目が含まれないこと
/// - スコアが 1〜20 の範囲であること
pub fn parse_evaluation_response(response: &str, sketch_type: SketchType) -> Result<Evaluation> {
    let json_str = extract_json(response).map_err(|e| shape_error(e.to_string(), response))?;
    let evaluation: Evaluation = serde_json::from_str(json_str.trim())
        .map_err(|e| shape_error(format!("評価JSONパースエラー: {}", e), response))?;

    let missing = evaluation.missing_for(sketch_type);
    if !missing.is_empty() {
        let keys: Vec<&str> = missing.iter().map(|c| c.key()).collect();
        return Err(shape_error(
            format!("必須項目がありません: {}", keys.join(", ")),
            response,
        ));
    }

    let extra = evaluation.extra_for(sketch_type);
    if !extra.is_empty() {
        let keys: Vec<&str> = extra.iter().map(|c| c.key()).collect();
        return Err(shape_error(
            format!("{} に含まれない項目があります: {}", sketch_type, keys.join(", ")),
            response,
        ));
    }

    if let Some((criterion, result)) = evaluation
        .present()
        .find(|(_, r)| !(SCORE_MIN..=SCORE_MAX).contains(&r.score))
    {
        return Err(shape_error(
            format!("{} のスコアが範囲外です: {}", criterion.key(), result.score),
            response,
        ));
    }

    Ok(evaluation)
}
