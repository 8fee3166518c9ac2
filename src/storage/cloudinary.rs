use super::{ImageStore, UploadedImage};
use crate::config::CloudinaryCredentials;
use crate::error::{Result, SketchCritiqueError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DELIVERY_BASE: &str = "https://res.cloudinary.com";

pub struct CloudinaryStore {
    client: Client,
    credentials: CloudinaryCredentials,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    format: String,
}

/// 署名付きアップロードの署名
///
/// パラメータをキー順に `k=v&...` で連結し、シークレットを付けて SHA-256。
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl CloudinaryStore {
    pub fn new(credentials: CloudinaryCredentials, folder: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            credentials,
            folder: folder.into(),
        })
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", API_BASE, self.credentials.cloud_name)
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = [("folder", self.folder.clone()), ("timestamp", timestamp.clone())];
        let signature = sign_params(&params, &self.credentials.api_secret);

        let file = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        debug!(file_name, folder = %self.folder, "画像アップロード");
        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SketchCritiqueError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SketchCritiqueError::Upload(format!("HTTP {}: {}", status, detail.trim())));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| SketchCritiqueError::Upload(format!("レスポンス解析エラー: {}", e)))?;

        Ok(UploadedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
            width: uploaded.width,
            height: uploaded.height,
            format: uploaded.format,
        })
    }

    fn delivery_url(&self, public_id: &str) -> String {
        format!(
            "{}/{}/image/upload/{}",
            DELIVERY_BASE, self.credentials.cloud_name, public_id
        )
    }
}
