//! Sketch Critique Common Library
//!
//! CLIと各エクスポートで共有されるルーブリック・評価型・スコア変換・行マッピング

pub mod error;
pub mod export;
pub mod mapping;
pub mod parser;
pub mod prompts;
pub mod report;
pub mod rubric;
pub mod schema;
pub mod scoring;
pub mod types;

pub use error::{Error, Result};
pub use mapping::{flatten, unflatten, Row};
pub use parser::{extract_json, parse_evaluation_response};
pub use prompts::{build_system_prompt, build_user_prompt};
pub use report::{build_report, Cell, ReEvaluation, Report};
pub use rubric::{Criterion, SketchType, SCORE_MAX, SCORE_MIN};
pub use schema::{build_response_schema, response_format};
pub use scoring::{compare, summarize, ScoreComparison, ScoreCurve, ScoreSummary};
pub use types::{Artwork, CriterionResult, Evaluation, EvaluationRecord, NewArtwork};
