//! 単体評価モジュール
//!
//! 画像検証 → アップロード → 評価 → 保存 を順に実行する。
//! ドライランではアップロードと保存を行わず、縮小画像を data URL で送る。

use crate::datastore::ArtworkStore;
use crate::error::{Result, SketchCritiqueError};
use crate::evaluator::{EvaluationRequest, Evaluator, ImageSource};
use crate::scanner;
use crate::storage::ImageStore;
use dialoguer::{Input, Select};
use sketch_critique_common::{Artwork, NewArtwork, SketchType};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 保存先（ドライランでは None）
pub struct Persistence<'a> {
    pub images: &'a dyn ImageStore,
    pub store: &'a dyn ArtworkStore,
}

#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub image_path: PathBuf,
    pub artist_name: String,
    pub sketch_type: SketchType,
    pub description: Option<String>,
    /// 省略時はEXIF日付
    pub artwork_date: Option<String>,
    /// data URL 送信時の長辺px
    pub max_image_size: u32,
}

/// 保存前のID（ドライラン時）
pub const UNSAVED_ID: &str = "(dry-run)";

fn created_at_now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub async fn submit_artwork(
    evaluator: &dyn Evaluator,
    persistence: Option<Persistence<'_>>,
    options: &SubmitOptions,
) -> Result<Artwork> {
    let image = scanner::load_image(&options.image_path)?;
    debug!(file = %image.file_name, width = image.width, height = image.height, "画像読み込み");

    let artwork_date = match &options.artwork_date {
        Some(date) => Some(date.clone()),
        None => scanner::extract_date(&options.image_path).ok(),
    };

    let (source, image_url, image_public_id) = match &persistence {
        Some(p) => {
            let uploaded = p.images.upload(image.bytes.clone(), &image.file_name).await?;
            info!("✔ アップロード完了: {}", uploaded.url);
            (
                ImageSource::Url(uploaded.url.clone()),
                uploaded.url,
                uploaded.public_id,
            )
        }
        None => (
            ImageSource::DataUrl(scanner::to_data_url(&image, options.max_image_size)?),
            String::new(),
            String::new(),
        ),
    };

    let request = EvaluationRequest::new(source, options.artist_name.clone(), options.sketch_type);
    let outcome = evaluator.evaluate(&request).await?;
    info!("✔ 評価完了 ({})", evaluator.model());

    let title = if outcome.evaluation.generated_title.trim().is_empty() {
        file_stem(&options.image_path)
    } else {
        outcome.evaluation.generated_title.clone()
    };

    let new_artwork = NewArtwork {
        title,
        description: options.description.clone().unwrap_or_default(),
        artist_name: options.artist_name.clone(),
        created_at: created_at_now(),
        artwork_date,
        image_url,
        image_public_id,
        sketch_type: options.sketch_type,
        question: Some(request.user_prompt()),
        gpt_response: Some(outcome.raw_response),
        evaluation_version: Some(evaluator.model().to_string()),
        evaluation: outcome.evaluation,
    };

    match persistence {
        Some(p) => {
            let stored = p.store.insert(&new_artwork).await?;
            info!("✔ 保存完了: {}", stored.id);
            Ok(stored)
        }
        None => Ok(new_artwork.into_artwork(UNSAVED_ID)),
    }
}

/// 作者名を対話入力（端末でなければ空）
pub fn prompt_artist_name() -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Ok(String::new());
    }
    let name: String = Input::new()
        .with_prompt("作者名（空欄可）")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| SketchCritiqueError::Config(e.to_string()))?;
    Ok(name.trim().to_string())
}

/// 評価モードを対話選択（端末でなければ full realism）
pub fn prompt_sketch_type() -> Result<SketchType> {
    if !std::io::stdin().is_terminal() {
        return Ok(SketchType::default());
    }
    let labels: Vec<&str> = SketchType::ALL.iter().map(|t| t.as_str()).collect();
    let selected = Select::new()
        .with_prompt("評価モード")
        .items(&labels)
        .default(1)
        .interact()
        .map_err(|e| SketchCritiqueError::Config(e.to_string()))?;
    Ok(SketchType::ALL[selected])
}
