use crate::error::{Result, SketchCritiqueError};
use serde::{Deserialize, Serialize};
use sketch_critique_common::ScoreCurve;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-4.1-2025-04-14";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub key: Option<String>,
    pub table: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            table: "artworks".into(),
        }
    }
}

/// 解決済みの Cloudinary 認証情報
#[derive(Debug, Clone, PartialEq)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// 解決済みの Supabase 接続情報
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseCredentials {
    pub url: String,
    pub key: String,
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub model: String,
    pub cloudinary: CloudinaryConfig,
    pub supabase: SupabaseConfig,
    /// 送信前に縮小する長辺px
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    /// バッチ評価の呼び出し間隔
    pub request_delay_ms: u64,
    pub reports_dir: PathBuf,
    pub upload_folder: String,
    pub score_curve: ScoreCurve,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: DEFAULT_MODEL.into(),
            cloudinary: CloudinaryConfig::default(),
            supabase: SupabaseConfig::default(),
            max_image_size: 1568,
            timeout_seconds: 120,
            request_delay_ms: 1000,
            reports_dir: PathBuf::from("reports"),
            upload_folder: "artwork".into(),
            score_curve: ScoreCurve::CURRENT,
        }
    }
}

/// 環境変数 → 設定ファイルの順で認証情報を解決
pub fn resolve_credential(name: &str, env_value: Option<String>, stored: Option<&str>) -> Result<String> {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| stored.filter(|v| !v.trim().is_empty()).map(str::to_string))
        .ok_or_else(|| SketchCritiqueError::MissingCredential(name.to_string()))
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SketchCritiqueError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sketch-critique").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.score_curve.is_valid() {
            return Err(SketchCritiqueError::Config(format!(
                "score_curve が不正です (high={}, low={})",
                self.score_curve.high, self.score_curve.low
            )));
        }
        if self.model.trim().is_empty() {
            return Err(SketchCritiqueError::Config("model が空です".into()));
        }
        Ok(())
    }

    pub fn openai_api_key(&self) -> Result<String> {
        resolve_credential(
            "OPENAI_API_KEY",
            env("OPENAI_API_KEY"),
            self.openai_api_key.as_deref(),
        )
    }

    pub fn cloudinary_credentials(&self) -> Result<CloudinaryCredentials> {
        Ok(CloudinaryCredentials {
            cloud_name: resolve_credential(
                "CLOUDINARY_CLOUD_NAME",
                env("CLOUDINARY_CLOUD_NAME"),
                self.cloudinary.cloud_name.as_deref(),
            )?,
            api_key: resolve_credential(
                "CLOUDINARY_API_KEY",
                env("CLOUDINARY_API_KEY"),
                self.cloudinary.api_key.as_deref(),
            )?,
            api_secret: resolve_credential(
                "CLOUDINARY_API_SECRET",
                env("CLOUDINARY_API_SECRET"),
                self.cloudinary.api_secret.as_deref(),
            )?,
        })
    }

    pub fn supabase_credentials(&self) -> Result<SupabaseCredentials> {
        Ok(SupabaseCredentials {
            url: resolve_credential("SUPABASE_URL", env("SUPABASE_URL"), self.supabase.url.as_deref())?,
            key: resolve_credential("SUPABASE_KEY", env("SUPABASE_KEY"), self.supabase.key.as_deref())?,
            table: self.supabase.table.clone(),
        })
    }

    pub fn set_openai_key(&mut self, key: String) -> Result<()> {
        self.openai_api_key = Some(key);
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        self.model = model;
        self.save()
    }

    pub fn request_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_delay_ms)
    }
}
