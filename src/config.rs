use crate::error::{AlbumError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ストアパスを上書きする環境変数
pub const STORE_ENV: &str = "PHOTO_ALBUM_STORE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store_path: Option<PathBuf>,
    pub thumbnail_max_width: u32,
    /// JPEG品質 (0-100)
    pub thumbnail_quality: u8,
    pub decoration_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            thumbnail_max_width: 800,
            thumbnail_quality: 85,
            decoration_dir: "decorations".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
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
            .ok_or_else(|| AlbumError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-album").join("config.json"))
    }

    /// 実際に使うストアのパス（環境変数 > 設定ファイル > データディレクトリ）
    pub fn resolve_store_path(&self) -> Result<PathBuf> {
        if let Ok(path) = std::env::var(STORE_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }

        let data = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| AlbumError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("photo-album").join("photos.json"))
    }

    pub fn set_store_path(&mut self, path: PathBuf) -> Result<()> {
        self.store_path = Some(path);
        self.save()
    }

    pub fn thumbnail_options(&self) -> crate::codec::ThumbnailOptions {
        crate::codec::ThumbnailOptions {
            max_width: self.thumbnail_max_width,
            quality: self.thumbnail_quality.min(100),
        }
    }
}
