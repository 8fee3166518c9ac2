//! 画像の読み込み・検証と data URL 変換

mod exif;

pub use self::exif::extract_date;

use crate::error::{Result, SketchCritiqueError};
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// 読み込み・検証済みの画像
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// PNG/JPEG として読み込めることを確認して返す
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    if !path.is_file() {
        return Err(SketchCritiqueError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)
        .map_err(|_| SketchCritiqueError::UnsupportedImage(path.display().to_string()))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(SketchCritiqueError::UnsupportedImage(path.display().to_string()));
    }

    let decoded = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| SketchCritiqueError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    Ok(LoadedImage {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        width: decoded.width(),
        height: decoded.height(),
        bytes,
        format,
    })
}

/// 長辺 `max_size` px に縮小した JPEG の data URL
pub fn to_data_url(image: &LoadedImage, max_size: u32) -> Result<String> {
    let decoded = image::load_from_memory_with_format(&image.bytes, image.format)
        .map_err(|e| SketchCritiqueError::ImageLoad(e.to_string()))?;

    let resized = if decoded.width() > max_size || decoded.height() > max_size {
        decoded.resize(max_size, max_size, image::imageops::FilterType::Lanczos3)
    } else {
        decoded
    };

    // JPEG はアルファ非対応
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .map_err(|e| SketchCritiqueError::ImageLoad(e.to_string()))?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/jpeg;base64,{}", encoded))
}
