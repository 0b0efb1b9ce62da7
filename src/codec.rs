//! 画像コーデック
//!
//! アップロードされた画像を2種類のData URLに変換する:
//! - オリジナル: 無加工のままbase64化
//! - サムネイル: 最大幅に収まるよう縮小し、JPEGで再圧縮
//!
//! どちらもファイル読み込みで中断する非同期関数で、呼び出し側は1ファイルごとに並行実行する。

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use photo_album_common::EncodedImage;
use std::path::Path;

use crate::error::{AlbumError, Result};

const FALLBACK_MIME: &str = "application/octet-stream";
const THUMBNAIL_MIME: &str = "image/jpeg";

/// サムネイル生成設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailOptions {
    /// 最大ピクセル幅
    pub max_width: u32,
    /// JPEG品質 (0-100)
    pub quality: u8,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            max_width: 800,
            quality: 85,
        }
    }
}

/// 縦横比を保った縮小後サイズ（拡大はしない）
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let new_height = (u64::from(height) * u64::from(max_width) / u64::from(width)) as u32;
    (max_width, new_height.max(1))
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| AlbumError::Decode(format!("{}: {}", path.display(), e)))
}

/// ファイルをそのままData URL化
pub async fn encode_original(path: &Path) -> Result<EncodedImage> {
    let bytes = read_file(path).await?;
    Ok(encode_original_bytes(&bytes))
}

/// 縮小・再圧縮したサムネイルをData URL化
pub async fn encode_thumbnail(path: &Path, options: ThumbnailOptions) -> Result<EncodedImage> {
    let bytes = read_file(path).await?;
    // デコード前に他の読み込みへ制御を譲る
    tokio::task::yield_now().await;
    encode_thumbnail_bytes(&bytes, options)
        .map_err(|e| AlbumError::Decode(format!("{}: {}", path.display(), e)))
}

pub fn encode_original_bytes(bytes: &[u8]) -> EncodedImage {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME);
    EncodedImage::from_base64(mime, &STANDARD.encode(bytes))
}

pub fn encode_thumbnail_bytes(bytes: &[u8], options: ThumbnailOptions) -> Result<EncodedImage> {
    let img = image::load_from_memory(bytes).map_err(|e| AlbumError::Decode(e.to_string()))?;

    let (width, height) = target_dimensions(img.width(), img.height(), options.max_width);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    // JPEGはアルファなし
    let rgb = resized.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, options.quality.min(100))
        .encode_image(&rgb)
        .map_err(|e| AlbumError::Decode(format!("JPEGエンコード失敗: {}", e)))?;

    Ok(EncodedImage::from_base64(THUMBNAIL_MIME, &STANDARD.encode(&buffer)))
}

/// Data URLからバイト列を復元
pub fn decode_data_url(image: &EncodedImage) -> Result<Vec<u8>> {
    let payload = image
        .payload()
        .ok_or_else(|| AlbumError::Decode("Data URLではありません".into()))?;
    STANDARD
        .decode(payload)
        .map_err(|e| AlbumError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 80, 120, 255]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_target_dimensions_scales_down() {
        assert_eq!(target_dimensions(1600, 1200, 800), (800, 600));
        assert_eq!(target_dimensions(1000, 333, 800), (800, 266));
    }

    #[test]
    fn test_target_dimensions_keeps_small() {
        assert_eq!(target_dimensions(640, 480, 800), (640, 480));
        assert_eq!(target_dimensions(800, 10, 800), (800, 10));
    }

    #[test]
    fn test_target_dimensions_never_zero_height() {
        assert_eq!(target_dimensions(5000, 1, 800), (800, 1));
    }

    #[test]
    fn test_thumbnail_is_resized_jpeg() {
        let thumb = encode_thumbnail_bytes(&png_bytes(1200, 600), ThumbnailOptions::default()).unwrap();
        assert_eq!(thumb.mime_type(), Some("image/jpeg"));

        let decoded = image::load_from_memory(&decode_data_url(&thumb).unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 400));
    }

    #[test]
    fn test_thumbnail_rejects_garbage() {
        let result = encode_thumbnail_bytes(b"not an image", ThumbnailOptions::default());
        assert!(matches!(result, Err(AlbumError::Decode(_))));
    }

    #[test]
    fn test_original_is_passthrough() {
        let bytes = png_bytes(10, 10);
        let original = encode_original_bytes(&bytes);
        assert_eq!(original.mime_type(), Some("image/png"));
        assert_eq!(decode_data_url(&original).unwrap(), bytes);
    }

    #[test]
    fn test_original_unknown_format_still_encodes() {
        let original = encode_original_bytes(b"plain text");
        assert_eq!(original.mime_type(), Some(FALLBACK_MIME));
    }

    #[tokio::test]
    async fn test_missing_file_is_decode_error() {
        let path = Path::new("/nonexistent/photo-album/missing.jpg");
        assert!(matches!(encode_original(path).await, Err(AlbumError::Decode(_))));
        assert!(matches!(
            encode_thumbnail(path, ThumbnailOptions::default()).await,
            Err(AlbumError::Decode(_))
        ));
    }
}
