//! JSONファイルによるストア実装
//!
//! 一時ファイルに書いてからリネームすることで全件置換を原子的に行う。

use super::{PhotoStore, COLLECTION_NAME};
use crate::error::{AlbumError, Result};
use photo_album_common::{Photo, PhotoId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// ストアファイルの構造
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// バージョン（互換性チェック用）
    version: u32,
    collection: String,
    /// 写真ID → レコード
    records: BTreeMap<PhotoId, Photo>,
}

impl StoreFile {
    const CURRENT_VERSION: u32 = 1;

    fn new(records: BTreeMap<PhotoId, Photo>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            collection: COLLECTION_NAME.to_string(),
            records,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

fn persistence(path: &Path, e: impl std::fmt::Display) -> AlbumError {
    AlbumError::Persistence(format!("{}: {}", path.display(), e))
}

impl JsonFileStore {
    /// ストアを開く。ファイルがなければ空のコレクションで作成
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };

        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persistence(parent, e))?;
        }

        let exists = tokio::fs::try_exists(&store.path)
            .await
            .map_err(|e| persistence(&store.path, e))?;
        if !exists {
            debug!(path = %store.path.display(), "creating empty photo store");
            store.write(&StoreFile::new(BTreeMap::new())).await?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write(&self, file: &StoreFile) -> Result<()> {
        let content = serde_json::to_vec_pretty(file)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, content)
            .await
            .map_err(|e| persistence(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| persistence(&self.path, e))
    }
}

impl PhotoStore for JsonFileStore {
    async fn replace_all(&self, photos: &[Photo]) -> Result<()> {
        let records = photos.iter().map(|p| (p.id(), p.clone())).collect();
        self.write(&StoreFile::new(records)).await?;
        debug!(count = photos.len(), "photo store replaced");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Photo>> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|e| persistence(&self.path, e))?;
        let file: StoreFile =
            serde_json::from_slice(&content).map_err(|e| persistence(&self.path, e))?;

        if file.version != StoreFile::CURRENT_VERSION {
            return Err(persistence(
                &self.path,
                format!("未対応のストアバージョン {}", file.version),
            ));
        }
        if file.collection != COLLECTION_NAME {
            return Err(persistence(
                &self.path,
                format!("コレクション名が不正: {}", file.collection),
            ));
        }

        Ok(file.records.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_album_common::{parse_date, Catalog, EncodedImage, PhotoDraft};
    use tempfile::tempdir;

    fn photos() -> Vec<Photo> {
        let mut catalog = Catalog::new();
        for (i, date) in ["2024-01-01", "2023-05-05"].iter().enumerate() {
            catalog.upsert(
                PhotoDraft {
                    filename: format!("{}.jpg", i),
                    date: parse_date(date).unwrap(),
                    thumbnail: EncodedImage::from_base64("image/jpeg", "AAAA"),
                    original: EncodedImage::from_base64("image/jpeg", "BBBB"),
                },
                100,
            )
            .unwrap();
        }
        catalog.photos().to_vec()
    }

    #[tokio::test]
    async fn test_open_creates_empty_collection() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("photos.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_is_full_replace() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = JsonFileStore::open(dir.path().join("photos.json")).await.unwrap();

        let all = photos();
        store.replace_all(&all).await.unwrap();
        assert_eq!(store.load_all().await.unwrap().len(), 2);

        store.replace_all(&all[..1]).await.unwrap();
        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, all[..1].to_vec());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_records_keyed_by_id() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = JsonFileStore::open(dir.path().join("photos.json")).await.unwrap();
        store.replace_all(&photos()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["collection"], "photos");
        assert_eq!(raw["records"]["100"]["filename"], "0.jpg");
        assert_eq!(raw["records"]["101"]["year"], 2023);
    }

    #[tokio::test]
    async fn test_corrupted_file_is_persistence_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("photos.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(matches!(store.load_all().await, Err(AlbumError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_version_mismatch_is_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("photos.json");
        std::fs::write(&path, r#"{"version": 99, "collection": "photos", "records": {}}"#).unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(matches!(store.load_all().await, Err(AlbumError::Persistence(_))));
    }
}
