mod exif;

pub use self::exif::extract_date;

use crate::album::UploadItem;
use crate::error::{AlbumError, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// EXIFの撮影日（取得できた場合のみ）
    pub date: Option<NaiveDate>,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// 指定パスから取り込み対象を集める
///
/// - ファイルはそのまま（拡張子を問わない。読めなければアップロード時にスキップ）
/// - フォルダは直下の画像のみ、ファイル名順
pub fn collect_images(paths: &[PathBuf]) -> Result<Vec<ImageInfo>> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            images.extend(scan_folder(path)?);
        } else if path.exists() {
            images.push(image_info(path));
        } else {
            return Err(AlbumError::UserInput(format!(
                "ファイルが見つかりません: {}",
                path.display()
            )));
        }
    }

    Ok(images)
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(AlbumError::UserInput(format!(
            "フォルダが見つかりません: {}",
            folder.display()
        )));
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && is_image_path(e.path()))
        .map(|e| image_info(e.path()))
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

fn image_info(path: &Path) -> ImageInfo {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    ImageInfo {
        path: path.to_path_buf(),
        file_name,
        date: extract_date(path),
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
        .unwrap_or(false)
}

/// 画像に日付を割り当ててアップロード項目にする
///
/// - 日付1つ: 全ファイルに適用
/// - 日付がファイル数と同数: 順番に対応
/// - `use_exif`: 未指定分をEXIFの撮影日で補う
///
/// 日付が決まらないファイルは `None` のまま（アップロード時に入力エラーになる）。
pub fn assign_dates(
    images: Vec<ImageInfo>,
    dates: &[NaiveDate],
    use_exif: bool,
) -> Result<Vec<UploadItem>> {
    if dates.len() > 1 && dates.len() != images.len() {
        return Err(AlbumError::UserInput(format!(
            "日付の数({})がファイル数({})と一致しません",
            dates.len(),
            images.len()
        )));
    }

    Ok(images
        .into_iter()
        .enumerate()
        .map(|(i, img)| {
            let explicit = match dates.len() {
                0 => None,
                1 => Some(dates[0]),
                _ => Some(dates[i]),
            };
            let date = explicit.or(if use_exif { img.date } else { None });
            UploadItem {
                path: img.path,
                filename: img.file_name,
                date,
            }
        })
        .collect())
}
