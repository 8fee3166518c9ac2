//! プロンプト生成モジュール
//!
//! - build_system_prompt: 評価モード別の講評指示
//! - build_user_prompt: 画像に添えるユーザーメッセージ

use crate::rubric::SketchType;

const CRITIC_PREAMBLE: &str = "You are an expert art critic and instructor. \
Evaluate the provided sketch using the following criteria, scoring each one on a scale of 1 to 20 \
(1 = Poor, 20 = Excellent). For each category, include:
A 1–3 sentence rationale explaining the score.
A set of 1–3 actionable tips for how the artist could improve the submitted artwork specifically in each area.

Also, please create a creative title for this artwork based on what you see.
If you recognize a character, object, or location, please include that in the title.";

/// 評価モード別のシステムプロンプト
///
/// 評価項目はルーブリック順に `Label – question` 形式で列挙する。
pub fn build_system_prompt(sketch_type: SketchType) -> String {
    let criteria = sketch_type
        .criteria()
        .iter()
        .map(|c| format!("{} – {}", c.label(), c.question()))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{CRITIC_PREAMBLE}\n\nEvaluation Criteria:\n{criteria}")
}

/// 画像に添えるユーザーメッセージ
pub fn build_user_prompt(artist_name: &str) -> String {
    let artist = artist_name.trim();
    if artist.is_empty() {
        "Here's an artwork by Unknown artist.".to_string()
    } else {
        format!("Here's an artwork by {}.", artist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::Criterion;

    #[test]
    fn test_quick_sketch_prompt_lists_four_criteria() {
        let prompt = build_system_prompt(SketchType::QuickSketch);
        assert!(prompt.contains("Proportion & Structure –"));
        assert!(prompt.contains("Mood & Expression –"));
        assert!(!prompt.contains("Value & Light"));
        assert!(!prompt.contains("Overall Realism"));
    }

    #[test]
    fn test_full_realism_prompt_lists_all_criteria_in_order() {
        let prompt = build_system_prompt(SketchType::FullRealism);
        let positions: Vec<usize> = Criterion::ALL
            .iter()
            .map(|c| prompt.find(c.label()).expect("項目がない"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.contains("scale of 1 to 20"));
    }

    #[test]
    fn test_user_prompt() {
        assert_eq!(build_user_prompt("Mika"), "Here's an artwork by Mika.");
        assert_eq!(build_user_prompt("  "), "Here's an artwork by Unknown artist.");
    }
}
