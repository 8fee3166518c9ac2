//! 再評価バッチ
//!
//! 保存済みアートワークを新しい順に1件ずつ評価する。
//! 呼び出しごとに一定時間待機し、失敗した作品はログに残してスキップする。
//! データストアは変更しない。

use crate::datastore::ArtworkStore;
use crate::error::Result;
use crate::evaluator::{EvaluationRequest, Evaluator, ImageSource};
use crate::storage::ImageStore;
use indicatif::{ProgressBar, ProgressStyle};
use sketch_critique_common::{Artwork, ReEvaluation, SketchType};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub sketch_type: SketchType,
    /// 0 で全件
    pub limit: usize,
    pub delay: Duration,
    /// システムプロンプトの置き換え
    pub custom_instructions: Option<String>,
    pub show_progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            sketch_type: SketchType::FullRealism,
            limit: 5,
            delay: Duration::from_secs(1),
            custom_instructions: None,
            show_progress: false,
        }
    }
}

/// 失敗・スキップした作品
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub artwork_id: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<ReEvaluation>,
    pub failures: Vec<BatchFailure>,
    /// 評価APIを呼び出した回数
    pub attempted: usize,
}

/// 評価に使う画像URL: image_url → public_id の配信URL → なし
pub fn artwork_image_source(artwork: &Artwork, images: &dyn ImageStore) -> Option<ImageSource> {
    if !artwork.image_url.trim().is_empty() {
        return Some(ImageSource::Url(artwork.image_url.clone()));
    }
    if !artwork.image_public_id.trim().is_empty() {
        return Some(ImageSource::Url(images.delivery_url(&artwork.image_public_id)));
    }
    None
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

pub async fn run_batch(
    evaluator: &dyn Evaluator,
    images: &dyn ImageStore,
    store: &dyn ArtworkStore,
    options: &BatchOptions,
) -> Result<BatchOutcome> {
    let limit = (options.limit > 0).then_some(options.limit);
    let artworks = store.list(limit).await?;
    info!(
        "{}件のアートワークを再評価します ({}, {})",
        artworks.len(),
        options.sketch_type,
        evaluator.model()
    );

    let bar = progress_bar(artworks.len(), options.show_progress);
    let mut outcome = BatchOutcome::default();

    for artwork in artworks {
        bar.set_message(artwork.title.clone());

        let Some(source) = artwork_image_source(&artwork, images) else {
            warn!("画像がないためスキップ: {}", artwork.id);
            outcome.failures.push(BatchFailure {
                artwork_id: artwork.id.clone(),
                reason: "画像URLがありません".into(),
            });
            bar.inc(1);
            continue;
        };

        let request = EvaluationRequest::new(source, artwork.artist_name.clone(), options.sketch_type)
            .with_instructions(options.custom_instructions.clone());

        outcome.attempted += 1;
        match evaluator.evaluate(&request).await {
            Ok(result) => {
                outcome.results.push(ReEvaluation {
                    artwork,
                    new_evaluation: result.evaluation,
                });
            }
            Err(e) => {
                match e.raw_response() {
                    Some(raw) => error!("評価失敗 {}: {}\n{}", artwork.id, e, raw),
                    None => error!("評価失敗 {}: {}", artwork.id, e),
                }
                outcome.failures.push(BatchFailure {
                    artwork_id: artwork.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
        bar.inc(1);

        if !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    bar.finish_and_clear();
    info!(
        "再評価完了: 成功 {}件 / 失敗 {}件",
        outcome.results.len(),
        outcome.failures.len()
    );
    Ok(outcome)
}
