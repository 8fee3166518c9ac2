//! インメモリ実装
//!
//! 評価API・画像ストレージ・データストアを外部接続なしで再現する。
//! 失敗を注入でき、バッチ・登録・反映のテストで使用。

use crate::datastore::ArtworkStore;
use crate::error::{Result, SketchCritiqueError};
use crate::evaluator::{EvaluationOutcome, EvaluationRequest, Evaluator};
use crate::storage::{ImageStore, UploadedImage};
use async_trait::async_trait;
use sketch_critique_common::{Artwork, CriterionResult, Evaluation, NewArtwork, Row};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// 固定スコアを返す評価器
#[derive(Clone)]
pub struct FakeEvaluator {
    model: String,
    score: i64,
    fail_images: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<Vec<EvaluationRequest>>>,
}

impl FakeEvaluator {
    pub fn new(score: i64) -> Self {
        FakeEvaluator {
            model: "fake-model".to_string(),
            score,
            fail_images: Arc::new(Mutex::new(HashSet::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 指定画像の評価を失敗させる
    pub fn fake_fail_image(&self, image_url: &str) {
        self.fail_images.lock().unwrap().insert(image_url.to_string());
    }

    pub fn calls(&self) -> Vec<EvaluationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Evaluator for FakeEvaluator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationOutcome> {
        self.calls.lock().unwrap().push(request.clone());

        if self.fail_images.lock().unwrap().contains(request.image.as_str()) {
            return Err(SketchCritiqueError::ApiCall(format!(
                "Simulated failure for image: {}",
                request.image.as_str()
            )));
        }

        let evaluation = request
            .sketch_type
            .criteria()
            .iter()
            .fold(Evaluation::new("Fake Title"), |e, c| {
                e.with(
                    *c,
                    CriterionResult::new(
                        self.score,
                        format!("{} looks steady.", c.label()),
                        vec!["Tip one.".to_string(), "Tip two.".to_string()],
                    ),
                )
            });
        let raw_response = serde_json::to_string(&evaluation)?;

        Ok(EvaluationOutcome {
            evaluation,
            raw_response,
        })
    }
}

/// アップロード内容を記録するだけの画像ストレージ
#[derive(Clone, Default)]
pub struct FakeImageStore {
    uploads: Arc<Mutex<Vec<(String, usize)>>>,
    fail: Arc<Mutex<bool>>,
}

impl FakeImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fake_fail_uploads(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// (ファイル名, バイト数)
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage> {
        if *self.fail.lock().unwrap() {
            return Err(SketchCritiqueError::Upload(format!(
                "Simulated failure for upload: {}",
                file_name
            )));
        }

        self.uploads.lock().unwrap().push((file_name.to_string(), bytes.len()));
        let stem = file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(file_name);
        let public_id = format!("artwork/{}", stem);

        Ok(UploadedImage {
            url: self.delivery_url(&public_id),
            public_id,
            width: 0,
            height: 0,
            format: file_name.rsplit_once('.').map(|(_, e)| e.to_lowercase()).unwrap_or_default(),
        })
    }

    fn delivery_url(&self, public_id: &str) -> String {
        format!("https://fake.cdn/image/upload/{}", public_id)
    }
}

/// インメモリのアートワークテーブル
#[derive(Clone, Default)]
pub struct FakeArtworkStore {
    artworks: Arc<Mutex<Vec<Artwork>>>,
    fail_updates: Arc<Mutex<HashSet<String>>>,
    next_id: Arc<Mutex<u64>>,
}

impl FakeArtworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artworks(artworks: Vec<Artwork>) -> Self {
        let store = Self::new();
        *store.artworks.lock().unwrap() = artworks;
        store
    }

    /// 指定IDの更新を失敗させる
    pub fn fake_fail_update(&self, id: &str) {
        self.fail_updates.lock().unwrap().insert(id.to_string());
    }

    pub fn artworks(&self) -> Vec<Artwork> {
        self.artworks.lock().unwrap().clone()
    }

    fn newest_first(mut artworks: Vec<Artwork>, limit: Option<usize>) -> Vec<Artwork> {
        artworks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            artworks.truncate(limit);
        }
        artworks
    }
}

#[async_trait]
impl ArtworkStore for FakeArtworkStore {
    async fn insert(&self, artwork: &NewArtwork) -> Result<Artwork> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            format!("fake-{}", *next_id)
        };
        let stored = artwork.clone().into_artwork(id);
        self.artworks.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<Artwork>> {
        Ok(Self::newest_first(self.artworks(), limit))
    }

    async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Artwork>> {
        let needle = query.trim().to_lowercase();
        let matched = self
            .artworks()
            .into_iter()
            .filter(|a| {
                a.title.to_lowercase().contains(&needle)
                    || a.description.to_lowercase().contains(&needle)
            })
            .collect();
        Ok(Self::newest_first(matched, limit))
    }

    async fn get(&self, id: &str) -> Result<Artwork> {
        self.artworks()
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| SketchCritiqueError::ArtworkNotFound(id.to_string()))
    }

    async fn update(&self, id: &str, changes: &Row) -> Result<()> {
        if self.fail_updates.lock().unwrap().contains(id) {
            return Err(SketchCritiqueError::Datastore(format!(
                "Simulated failure for update: {}",
                id
            )));
        }

        let mut artworks = self.artworks.lock().unwrap();
        let artwork = artworks
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| SketchCritiqueError::ArtworkNotFound(id.to_string()))?;

        let mut row = artwork.to_row();
        for (key, value) in changes {
            row.insert(key.clone(), value.clone());
        }
        *artwork = Artwork::from_row(&row)?;
        Ok(())
    }
}
