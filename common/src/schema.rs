//! 構造化出力スキーマ生成
//!
//! 評価モードごとに、評価モデルが満たすべき JSON Schema を組み立てる。

use crate::rubric::SketchType;
use serde_json::{json, Value};

/// レスポンスフォーマット名
pub const RESPONSE_FORMAT_NAME: &str = "artwork_evaluation";

/// 1項目分のスキーマ
pub fn criterion_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "score": {
                "type": "integer",
                "description": "Score between 1 and 20, where 1 is poor and 20 is excellent"
            },
            "rationale": {
                "type": "string",
                "description": "1-3 sentence explanation for the score"
            },
            "improvement_tips": {
                "type": "array",
                "items": { "type": "string" },
                "description": "1-3 actionable tips for improvement"
            }
        },
        "required": ["score", "rationale", "improvement_tips"],
        "additionalProperties": false
    })
}

/// 評価モードに対応する応答スキーマ
pub fn build_response_schema(sketch_type: SketchType) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "generated_title".to_string(),
        json!({
            "type": "string",
            "description": "A creative title for the artwork"
        }),
    );

    let mut required = vec![Value::from("generated_title")];
    for criterion in sketch_type.criteria() {
        properties.insert(criterion.key().to_string(), criterion_schema());
        required.push(Value::from(criterion.key()));
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Responses API の `text.format` に渡す値
pub fn response_format(sketch_type: SketchType) -> Value {
    json!({
        "type": "json_schema",
        "name": RESPONSE_FORMAT_NAME,
        "schema": build_response_schema(sketch_type),
        "strict": true
    })
}
