//! 画像ストレージ
//!
//! アップロードした画像の公開URLと public_id を返す。

mod cloudinary;

pub use cloudinary::{sign_params, CloudinaryStore};

use crate::error::Result;
use async_trait::async_trait;

/// アップロード結果
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage>;

    /// public_id から配信URLを組み立てる
    fn delivery_url(&self, public_id: &str) -> String;
}
