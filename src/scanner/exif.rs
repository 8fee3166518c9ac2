use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn extract_date(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut bufreader)?;

    // DateTimeOriginal を探す
    if let Some(field) = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY) {
        return to_iso_date(&field.display_value().to_string()).ok_or_else(|| "Invalid EXIF date".into());
    }

    // DateTime を探す
    if let Some(field) = exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY) {
        return to_iso_date(&field.display_value().to_string()).ok_or_else(|| "Invalid EXIF date".into());
    }

    Err("No date found in EXIF".into())
}

/// EXIF の日時表記を `YYYY-MM-DD` に変換
pub fn to_iso_date(value: &str) -> Option<String> {
    let value = value.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y:%m:%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}
